//! Read-only view of a game for rendering.

use serde::{Deserialize, Serialize};

use crate::cards::CardKind;
use crate::game::{GameState, Phase};

/// Presentation state of one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub position: usize,
    pub kind: CardKind,
    /// Face up and not yet matched
    pub is_flipped: bool,
    /// Belongs to a matched pair
    pub is_inactive: bool,
    /// Selecting it right now would be ignored by the lock or by clearing
    pub is_disabled: bool,
}

impl CardView {
    /// The kind when the card face shows, `None` while face down.
    pub fn visible_kind(&self) -> Option<&CardKind> {
        (self.is_flipped || self.is_inactive).then_some(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cards: Vec<CardView>,
    pub move_count: u32,
    pub best_score: Option<u32>,
    pub is_game_complete: bool,
    pub is_input_locked: bool,
    pub phase: Phase,
    pub round: u32,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        let revealed = state.revealed();
        let locked = state.is_input_locked();
        let cards = state
            .board()
            .cards()
            .iter()
            .map(|card| {
                let is_inactive = state.cleared_kinds().contains(&card.kind.name);
                CardView {
                    position: card.position,
                    kind: card.kind.clone(),
                    is_flipped: revealed.contains(&card.position),
                    is_inactive,
                    is_disabled: locked || is_inactive,
                }
            })
            .collect();
        Self {
            cards,
            move_count: state.moves(),
            best_score: state.best_score(),
            is_game_complete: state.is_complete(),
            is_input_locked: locked,
            phase: state.phase(),
            round: state.round(),
        }
    }

    /// Positions a selection would currently be accepted for.
    pub fn selectable(&self) -> Vec<usize> {
        if self.is_game_complete {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|c| !c.is_disabled && !c.is_flipped)
            .map(|c| c.position)
            .collect()
    }

    /// Face-up cards that are not cleared.
    pub fn flipped(&self) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|c| c.is_flipped)
            .map(|c| c.position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::deck::Board;
    use crate::game::{transition, Input};

    #[test]
    fn face_down_cards_hide_their_kind() {
        let a = CardKind::named("a");
        let b = CardKind::named("b");
        let board = Board::from_layout(vec![a.clone(), b.clone(), b, a]).unwrap();
        let state = GameState::new(board, None, Timing::default());
        let state = transition(&state, Input::Select(3)).unwrap().state;
        let snap = Snapshot::of(&state);

        assert_eq!(snap.cards[3].visible_kind().map(|k| k.name.as_str()), Some("a"));
        assert!(snap.cards[0].visible_kind().is_none());
        assert_eq!(snap.selectable(), vec![0, 1, 2]);
        assert_eq!(snap.flipped(), vec![3]);
    }

    #[test]
    fn lock_disables_every_card() {
        let a = CardKind::named("a");
        let b = CardKind::named("b");
        let board = Board::from_layout(vec![a.clone(), b.clone(), a, b]).unwrap();
        let state = GameState::new(board, None, Timing::default());
        let state = transition(&state, Input::Select(0)).unwrap().state;
        let state = transition(&state, Input::Select(1)).unwrap().state;
        let snap = Snapshot::of(&state);

        assert!(snap.is_input_locked);
        assert!(snap.cards.iter().all(|c| c.is_disabled));
        assert!(snap.selectable().is_empty());
    }
}
