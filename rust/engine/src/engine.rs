use std::sync::Arc;
use std::time::Duration;

use crate::cards::CardKind;
use crate::config::GameConfig;
use crate::deck::{Board, Dealer};
use crate::errors::{DeckError, Rejection};
use crate::events::{EventBus, EventSubscription, GameEvent};
use crate::game::{transition, Effect, GameState, Input, Phase};
use crate::snapshot::Snapshot;
use crate::store::{MemoryStore, ScoreStore};
use crate::timer::TimerQueue;

/// Owns one game session: the state, its pending timers, the dealer used for
/// restarts and the best-score store.
///
/// Time is virtual. Nothing fires until [`Engine::advance`] or
/// [`Engine::settle`] moves the clock, so a caller decides whether delays are
/// real (sleep then advance) or skipped entirely.
///
/// # Examples
///
/// ```
/// use memora_engine::config::GameConfig;
/// use memora_engine::engine::Engine;
///
/// let mut engine = Engine::in_memory(GameConfig::with_seed(7)).unwrap();
/// let lions = engine.board().positions_of("lion");
///
/// engine.select_card(lions[0]).unwrap();
/// engine.select_card(lions[1]).unwrap();
/// assert!(engine.is_input_locked());
///
/// engine.settle();
/// assert_eq!(engine.move_count(), 1);
/// assert!(engine.cleared_kinds().contains("lion"));
/// ```
pub struct Engine {
    state: GameState,
    kinds: Vec<CardKind>,
    dealer: Dealer,
    timers: TimerQueue,
    store: Box<dyn ScoreStore>,
    /// False once the store failed; the session then keeps its best in memory
    store_healthy: bool,
    bus: EventBus,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("seed", &self.dealer.seed())
            .field("timers", &self.timers)
            .field("store_healthy", &self.store_healthy)
            .finish()
    }
}

impl Engine {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self, DeckError> {
        config.validate()?;
        let mut dealer = match config.seed {
            Some(seed) => Dealer::new_with_seed(seed),
            None => Dealer::from_entropy(),
        };
        let board = dealer.deal(&config.kinds)?;

        let (best_score, store_healthy) = match store.load_best_score() {
            Ok(best) => (best, true),
            Err(e) => {
                tracing::warn!(error = %e, "best score unavailable, starting without one");
                (None, false)
            }
        };
        tracing::info!(
            seed = dealer.seed(),
            kinds = config.kinds.len(),
            best_score = ?best_score,
            "game session started"
        );

        Ok(Self {
            state: GameState::new(board, best_score, config.timing),
            kinds: config.kinds,
            dealer,
            timers: TimerQueue::new(),
            store,
            store_healthy,
            bus: EventBus::new(),
        })
    }

    /// Engine backed by a throwaway [`MemoryStore`].
    pub fn in_memory(config: GameConfig) -> Result<Self, DeckError> {
        Self::new(config, Box::new(MemoryStore::new()))
    }

    /// Reveals the card at `position` (zero-based).
    ///
    /// `Err` means the selection was ignored; the game is unchanged.
    pub fn select_card(&mut self, position: usize) -> Result<(), Rejection> {
        self.dispatch(Input::Select(position))
    }

    /// Presentation hook for a click. Ignored selections are silent.
    pub fn on_card_selected(&mut self, position: usize) {
        let _ = self.select_card(position);
    }

    /// Deals a new board and resets everything except the best score.
    /// Pending timers from the previous round are dropped.
    pub fn restart(&mut self) -> Result<(), DeckError> {
        let board = self.dealer.deal(&self.kinds)?;
        self.restart_with(board);
        Ok(())
    }

    /// Restarts on a caller-provided board instead of a fresh deal.
    pub fn restart_with(&mut self, board: Board) {
        // restart is always accepted
        let _ = self.dispatch(Input::Restart(Arc::new(board)));
    }

    /// Presentation hook for the restart control.
    pub fn on_restart_requested(&mut self) {
        if let Err(e) = self.restart() {
            tracing::error!(error = %e, "restart failed");
        }
    }

    /// Moves the virtual clock forward, firing every timer that comes due in
    /// deadline order.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timers.now().saturating_add(elapsed);
        while let Some(kind) = self.timers.pop_due(target) {
            let _ = self.dispatch(Input::TimerFired(kind));
        }
        self.timers.set_now(target);
    }

    /// Fires pending timers until none are left, including ones scheduled
    /// along the way.
    pub fn settle(&mut self) {
        while let Some(wait) = self.timers.time_until_next() {
            self.advance(wait);
        }
    }

    /// Time left before the next pending timer, if any.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Current virtual time since the session started.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.bus.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn kinds(&self) -> &[CardKind] {
        &self.kinds
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn move_count(&self) -> u32 {
        self.state.moves()
    }

    pub fn best_score(&self) -> Option<u32> {
        self.state.best_score()
    }

    pub fn revealed(&self) -> Vec<usize> {
        self.state.revealed()
    }

    pub fn cleared_kinds(&self) -> &std::collections::BTreeSet<String> {
        self.state.cleared_kinds()
    }

    pub fn is_input_locked(&self) -> bool {
        self.state.is_input_locked()
    }

    pub fn is_game_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn round(&self) -> u32 {
        self.state.round()
    }

    pub fn seed(&self) -> u64 {
        self.dealer.seed()
    }

    /// Whether best-score writes still reach the store this session.
    pub fn is_store_healthy(&self) -> bool {
        self.store_healthy
    }

    fn dispatch(&mut self, input: Input) -> Result<(), Rejection> {
        let step = match transition(&self.state, input) {
            Ok(step) => step,
            Err(reason) => {
                tracing::debug!(%reason, "input ignored");
                return Err(reason);
            }
        };
        self.state = step.state;
        for effect in step.effects {
            self.apply(effect);
        }
        Ok(())
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Schedule { timer, after } => {
                self.timers.schedule(timer, after);
            }
            Effect::Cancel(kind) => {
                let cancelled = self.timers.cancel(kind);
                if cancelled > 0 {
                    tracing::debug!(timer = ?kind, cancelled, "pending timer cancelled");
                }
            }
            Effect::CancelAll => self.timers.cancel_all(),
            Effect::PersistBestScore(score) => self.persist_best_score(score),
            Effect::Emit(event) => {
                match &event {
                    GameEvent::GameCompleted {
                        moves,
                        best_score,
                        new_record,
                    } => tracing::info!(moves, best_score, new_record, "game completed"),
                    GameEvent::GameRestarted { round } => {
                        tracing::info!(round, seed = self.dealer.seed(), "board dealt")
                    }
                    _ => {}
                }
                self.bus.broadcast(event);
            }
        }
    }

    fn persist_best_score(&mut self, score: u32) {
        if !self.store_healthy {
            tracing::debug!(best_score = score, "score store unavailable, keeping best in memory");
            return;
        }
        match self.store.save_best_score(score) {
            Ok(()) => tracing::info!(best_score = score, "best score saved"),
            Err(e) => {
                tracing::warn!(error = %e, best_score = score, "failed to save best score");
                self.store_healthy = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::errors::StoreError;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load_best_score(&self) -> Result<Option<u32>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn save_best_score(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
    }

    #[test]
    fn broken_store_starts_unset() {
        let engine = Engine::new(GameConfig::with_seed(1), Box::new(BrokenStore)).unwrap();
        assert_eq!(engine.best_score(), None);
        assert!(!engine.is_store_healthy());
    }

    #[test]
    fn advance_fires_only_due_timers() {
        let mut engine = Engine::in_memory(GameConfig::with_seed(3)).unwrap();
        let first = engine.board().positions_of("lion")[0];
        let other = engine.board().positions_of("fox")[0];
        engine.select_card(first).unwrap();
        engine.select_card(other).unwrap();

        engine.advance(Duration::from_millis(299));
        assert!(engine.is_input_locked());
        engine.advance(Duration::from_millis(1));
        assert!(matches!(engine.phase(), Phase::Mismatch { .. }));
        assert_eq!(engine.time_until_next_timer(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn advancing_past_the_end_of_time_saturates() {
        let mut engine = Engine::in_memory(GameConfig::with_seed(3)).unwrap();
        let first = engine.board().positions_of("lion")[0];
        let other = engine.board().positions_of("fox")[0];
        engine.select_card(first).unwrap();
        engine.select_card(other).unwrap();
        engine.advance(Duration::from_millis(1));
        engine.advance(Duration::MAX);
        assert_eq!(engine.now(), Duration::MAX);
        assert!(matches!(engine.phase(), Phase::Idle));
        assert!(!engine.has_pending_timers());
    }

    #[test]
    fn instant_timing_still_needs_a_tick() {
        let config = GameConfig {
            timing: Timing::instant(),
            ..GameConfig::with_seed(5)
        };
        let mut engine = Engine::in_memory(config).unwrap();
        let bears = engine.board().positions_of("bear");
        engine.select_card(bears[0]).unwrap();
        engine.select_card(bears[1]).unwrap();
        assert!(engine.is_input_locked());
        engine.advance(Duration::ZERO);
        assert!(!engine.is_input_locked());
        assert!(engine.cleared_kinds().contains("bear"));
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = GameConfig {
            kinds: vec![CardKind::named("only")],
            ..GameConfig::default()
        };
        assert!(matches!(
            Engine::in_memory(config),
            Err(DeckError::TooFewKinds { found: 1 })
        ));
    }
}
