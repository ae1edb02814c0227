//! Game state and the transition function driving it.
//!
//! [`transition`] is pure: it takes the current [`GameState`] and one
//! [`Input`] and returns the next state plus the [`Effect`]s the owner must
//! carry out (timers, persistence, notifications). The [`Engine`] is the only
//! owner in this crate, but anything that can schedule timers can drive it.
//!
//! [`Engine`]: crate::engine::Engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Timing;
use crate::deck::Board;
use crate::errors::Rejection;
use crate::events::GameEvent;
use crate::timer::TimerKind;

/// Where a round currently is.
///
/// `Mismatch` is the window after a failed pair where both cards are still
/// face up but input is already accepted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    OneRevealed { first: usize },
    Evaluating { first: usize, second: usize },
    Mismatch { first: usize, second: usize },
    Complete { new_record: bool },
}

impl Phase {
    /// Face-up, unmatched positions. Never more than two.
    pub fn revealed(&self) -> Vec<usize> {
        match *self {
            Phase::Idle | Phase::Complete { .. } => Vec::new(),
            Phase::OneRevealed { first } => vec![first],
            Phase::Evaluating { first, second } | Phase::Mismatch { first, second } => {
                vec![first, second]
            }
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Phase::Evaluating { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Phase::Complete { .. })
    }
}

/// Something that happened to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Select(usize),
    TimerFired(TimerKind),
    /// Start over on a freshly dealt board
    Restart(Arc<Board>),
}

/// Work the owner of the state performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Schedule { timer: TimerKind, after: Duration },
    Cancel(TimerKind),
    CancelAll,
    PersistBestScore(u32),
    Emit(GameEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

/// Complete state of one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Arc<Board>,
    phase: Phase,
    cleared: BTreeSet<String>,
    moves: u32,
    best_score: Option<u32>,
    round: u32,
    timing: Timing,
}

impl GameState {
    pub fn new(board: Board, best_score: Option<u32>, timing: Timing) -> Self {
        Self {
            board: Arc::new(board),
            phase: Phase::Idle,
            cleared: BTreeSet::new(),
            moves: 0,
            best_score,
            round: 1,
            timing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn best_score(&self) -> Option<u32> {
        self.best_score
    }

    /// 1 for the first deal, incremented by every restart.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn cleared_kinds(&self) -> &BTreeSet<String> {
        &self.cleared
    }

    pub fn revealed(&self) -> Vec<usize> {
        self.phase.revealed()
    }

    pub fn is_input_locked(&self) -> bool {
        self.phase.is_locked()
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_complete()
    }

    /// Whether the card at `position` belongs to a matched pair.
    pub fn is_cleared(&self, position: usize) -> bool {
        self.board
            .get(position)
            .is_some_and(|c| self.cleared.contains(&c.kind.name))
    }

    /// Why selecting `position` would be a no-op, if it would.
    pub fn check_selectable(&self, position: usize) -> Result<(), Rejection> {
        match self.phase {
            Phase::Complete { .. } => return Err(Rejection::GameComplete),
            Phase::Evaluating { .. } => return Err(Rejection::InputLocked),
            _ => {}
        }
        if position >= self.board.len() {
            return Err(Rejection::OutOfRange {
                position,
                size: self.board.len(),
            });
        }
        if self.is_cleared(position) {
            return Err(Rejection::AlreadyCleared { position });
        }
        if self.phase.revealed().contains(&position) {
            return Err(Rejection::AlreadyRevealed { position });
        }
        Ok(())
    }

    fn kind_at(&self, position: usize) -> String {
        self.board
            .get(position)
            .map(|c| c.kind.name.clone())
            .unwrap_or_default()
    }

    fn select(&mut self, position: usize, effects: &mut Vec<Effect>) -> Result<(), Rejection> {
        self.check_selectable(position)?;
        let revealed = GameEvent::CardRevealed {
            position,
            kind: self.kind_at(position),
        };
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::OneRevealed { first: position };
                effects.push(Effect::Emit(revealed));
            }
            Phase::Mismatch { first, second } => {
                // the stale un-reveal must not hide the new pick
                effects.push(Effect::Cancel(TimerKind::Conceal));
                effects.push(Effect::Emit(GameEvent::CardsConcealed {
                    positions: [first, second],
                }));
                self.phase = Phase::OneRevealed { first: position };
                effects.push(Effect::Emit(revealed));
            }
            Phase::OneRevealed { first } => {
                self.moves += 1;
                self.phase = Phase::Evaluating {
                    first,
                    second: position,
                };
                effects.push(Effect::Emit(revealed));
                effects.push(Effect::Schedule {
                    timer: TimerKind::Evaluate,
                    after: self.timing.reveal_delay,
                });
            }
            Phase::Evaluating { .. } => return Err(Rejection::InputLocked),
            Phase::Complete { .. } => return Err(Rejection::GameComplete),
        }
        Ok(())
    }

    fn evaluate(&mut self, effects: &mut Vec<Effect>) -> Result<(), Rejection> {
        let Phase::Evaluating { first, second } = self.phase else {
            return Err(Rejection::StaleTimer);
        };
        let kind = self.kind_at(first);
        if kind == self.kind_at(second) {
            self.cleared.insert(kind.clone());
            self.phase = Phase::Idle;
            effects.push(Effect::Emit(GameEvent::PairMatched {
                kind,
                positions: [first, second],
                moves: self.moves,
            }));
            self.check_game_over(effects);
        } else {
            self.phase = Phase::Mismatch { first, second };
            effects.push(Effect::Emit(GameEvent::PairMismatched {
                positions: [first, second],
                moves: self.moves,
            }));
            effects.push(Effect::Schedule {
                timer: TimerKind::Conceal,
                after: self.timing.conceal_delay,
            });
        }
        Ok(())
    }

    fn conceal(&mut self, effects: &mut Vec<Effect>) -> Result<(), Rejection> {
        let Phase::Mismatch { first, second } = self.phase else {
            return Err(Rejection::StaleTimer);
        };
        self.phase = Phase::Idle;
        effects.push(Effect::Emit(GameEvent::CardsConcealed {
            positions: [first, second],
        }));
        Ok(())
    }

    fn check_game_over(&mut self, effects: &mut Vec<Effect>) {
        if self.cleared.len() != self.board.kind_count() {
            return;
        }
        let new_record = self.best_score.map_or(true, |best| self.moves < best);
        let best = self
            .best_score
            .map_or(self.moves, |best| best.min(self.moves));
        if new_record {
            effects.push(Effect::PersistBestScore(best));
        }
        self.best_score = Some(best);
        self.phase = Phase::Complete { new_record };
        effects.push(Effect::Emit(GameEvent::GameCompleted {
            moves: self.moves,
            best_score: best,
            new_record,
        }));
    }

    fn reset(&mut self, board: Arc<Board>, effects: &mut Vec<Effect>) {
        self.board = board;
        self.phase = Phase::Idle;
        self.cleared.clear();
        self.moves = 0;
        self.round += 1;
        effects.push(Effect::CancelAll);
        effects.push(Effect::Emit(GameEvent::GameRestarted { round: self.round }));
    }
}

/// Applies one input to `state`.
///
/// Returns `Err` when the input is a no-op (a rejected selection or a timer
/// that no longer applies); `state` is then unchanged by definition.
///
/// # Examples
///
/// ```
/// use memora_engine::cards::CardKind;
/// use memora_engine::config::Timing;
/// use memora_engine::deck::Board;
/// use memora_engine::game::{transition, GameState, Input, Phase};
///
/// let lion = CardKind::named("lion");
/// let fox = CardKind::named("fox");
/// let board = Board::from_layout(vec![lion.clone(), fox.clone(), lion, fox]).unwrap();
/// let state = GameState::new(board, None, Timing::default());
///
/// let step = transition(&state, Input::Select(0)).unwrap();
/// assert_eq!(step.state.phase(), Phase::OneRevealed { first: 0 });
/// assert!(transition(&step.state, Input::Select(0)).is_err());
/// ```
pub fn transition(state: &GameState, input: Input) -> Result<Step, Rejection> {
    let mut next = state.clone();
    let mut effects = Vec::new();
    match input {
        Input::Select(position) => next.select(position, &mut effects)?,
        Input::TimerFired(TimerKind::Evaluate) => next.evaluate(&mut effects)?,
        Input::TimerFired(TimerKind::Conceal) => next.conceal(&mut effects)?,
        Input::Restart(board) => next.reset(board, &mut effects),
    }
    Ok(Step {
        state: next,
        effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn two_pairs() -> GameState {
        let a = CardKind::named("a");
        let b = CardKind::named("b");
        let board = Board::from_layout(vec![a.clone(), b.clone(), a, b]).unwrap();
        GameState::new(board, None, Timing::default())
    }

    fn apply(state: &GameState, input: Input) -> GameState {
        transition(state, input).expect("input accepted").state
    }

    #[test]
    fn second_pick_locks_and_counts() {
        let s = apply(&two_pairs(), Input::Select(0));
        assert_eq!(s.moves(), 0);
        let step = transition(&s, Input::Select(1)).unwrap();
        assert_eq!(step.state.moves(), 1);
        assert!(step.state.is_input_locked());
        assert!(step.effects.contains(&Effect::Schedule {
            timer: TimerKind::Evaluate,
            after: Duration::from_millis(300),
        }));
    }

    #[test]
    fn stale_timers_are_rejected() {
        let s = two_pairs();
        assert_eq!(
            transition(&s, Input::TimerFired(TimerKind::Evaluate)).unwrap_err(),
            Rejection::StaleTimer
        );
        assert_eq!(
            transition(&s, Input::TimerFired(TimerKind::Conceal)).unwrap_err(),
            Rejection::StaleTimer
        );
    }

    #[test]
    fn mismatch_then_new_pick_cancels_conceal() {
        let s = apply(&two_pairs(), Input::Select(0));
        let s = apply(&s, Input::Select(1));
        let s = apply(&s, Input::TimerFired(TimerKind::Evaluate));
        assert_eq!(s.phase(), Phase::Mismatch { first: 0, second: 1 });
        assert!(!s.is_input_locked());

        assert_eq!(
            transition(&s, Input::Select(1)).unwrap_err(),
            Rejection::AlreadyRevealed { position: 1 }
        );
        let step = transition(&s, Input::Select(2)).unwrap();
        assert_eq!(step.effects[0], Effect::Cancel(TimerKind::Conceal));
        assert_eq!(step.state.phase(), Phase::OneRevealed { first: 2 });
    }

    #[test]
    fn clearing_everything_completes_and_persists() {
        let mut s = two_pairs();
        for (x, y) in [(0, 2), (1, 3)] {
            s = apply(&s, Input::Select(x));
            s = apply(&s, Input::Select(y));
            let step = transition(&s, Input::TimerFired(TimerKind::Evaluate)).unwrap();
            s = step.state;
            if y == 3 {
                assert!(step.effects.contains(&Effect::PersistBestScore(2)));
            }
        }
        assert_eq!(s.phase(), Phase::Complete { new_record: true });
        assert_eq!(s.best_score(), Some(2));
        assert_eq!(
            transition(&s, Input::Select(0)).unwrap_err(),
            Rejection::GameComplete
        );
    }

    #[test]
    fn restart_keeps_best_and_bumps_round() {
        let s = GameState::new(two_pairs().board().clone(), Some(5), Timing::default());
        let s = apply(&s, Input::Select(0));
        let board = Arc::new(s.board().clone());
        let step = transition(&s, Input::Restart(board)).unwrap();
        assert_eq!(step.effects[0], Effect::CancelAll);
        assert_eq!(step.state.best_score(), Some(5));
        assert_eq!(step.state.round(), 2);
        assert_eq!(step.state.phase(), Phase::Idle);
    }
}
