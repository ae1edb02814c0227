use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cards::{Card, CardKind};
use crate::errors::DeckError;

/// Ordered sequence of dealt cards. Every kind appears exactly twice.
///
/// Serialized as the list of kinds in board order; deserializing goes through
/// [`Board::from_layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardKind>", into = "Vec<CardKind>")]
pub struct Board {
    cards: Vec<Card>,
    kind_count: usize,
}

impl Board {
    /// Builds a board from kinds already laid out in board order.
    ///
    /// Fails unless every kind in `layout` appears exactly twice and there
    /// are at least two kinds.
    pub fn from_layout(layout: Vec<CardKind>) -> Result<Self, DeckError> {
        let mut seen: Vec<(&CardKind, usize)> = Vec::new();
        for kind in &layout {
            match seen.iter_mut().find(|(k, _)| k.name == kind.name) {
                Some((_, n)) => *n += 1,
                None => seen.push((kind, 1)),
            }
        }
        if let Some((k, _)) = seen.iter().find(|(_, n)| *n != 2) {
            return Err(DeckError::UnpairedKind {
                name: k.name.clone(),
            });
        }
        if seen.len() < 2 {
            return Err(DeckError::TooFewKinds { found: seen.len() });
        }
        let kind_count = seen.len();
        let cards = layout
            .into_iter()
            .enumerate()
            .map(|(position, kind)| Card { kind, position })
            .collect();
        Ok(Self { cards, kind_count })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of distinct kinds, i.e. pairs to clear.
    pub fn kind_count(&self) -> usize {
        self.kind_count
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Positions holding the given kind, in board order.
    pub fn positions_of(&self, name: &str) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|c| c.kind.name == name)
            .map(|c| c.position)
            .collect()
    }
}

impl TryFrom<Vec<CardKind>> for Board {
    type Error = DeckError;

    fn try_from(layout: Vec<CardKind>) -> Result<Self, Self::Error> {
        Board::from_layout(layout)
    }
}

impl From<Board> for Vec<CardKind> {
    fn from(board: Board) -> Self {
        board.cards.into_iter().map(|c| c.kind).collect()
    }
}

/// Duplicates every kind and shuffles the pairs into a board.
///
/// The shuffle is Fisher–Yates: walking `i` from the length down to 1, a
/// uniform `j` in `[0, i)` is swapped with `i - 1`, so every permutation is
/// equally likely given a uniform `rng`.
///
/// # Errors
///
/// [`DeckError::TooFewKinds`] for fewer than two kinds and
/// [`DeckError::DuplicateKind`] when a name is repeated.
///
/// # Examples
///
/// ```
/// use memora_engine::cards::default_kinds;
/// use memora_engine::deck::build_deck;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let board = build_deck(&default_kinds(), &mut rng).unwrap();
/// assert_eq!(board.len(), 12);
/// assert_eq!(board.kind_count(), 6);
/// ```
pub fn build_deck<R: Rng>(kinds: &[CardKind], rng: &mut R) -> Result<Board, DeckError> {
    validate_kinds(kinds)?;
    let mut layout: Vec<CardKind> = kinds.iter().chain(kinds.iter()).cloned().collect();
    shuffle(&mut layout, rng);
    let cards = layout
        .into_iter()
        .enumerate()
        .map(|(position, kind)| Card { kind, position })
        .collect();
    Ok(Board {
        cards,
        kind_count: kinds.len(),
    })
}

/// Checks that `kinds` can be dealt: two or more, no repeated names.
pub fn validate_kinds(kinds: &[CardKind]) -> Result<(), DeckError> {
    if kinds.len() < 2 {
        return Err(DeckError::TooFewKinds { found: kinds.len() });
    }
    let mut names = HashSet::with_capacity(kinds.len());
    for k in kinds {
        if !names.insert(k.name.as_str()) {
            return Err(DeckError::DuplicateKind {
                name: k.name.clone(),
            });
        }
    }
    Ok(())
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..=items.len()).rev() {
        let j = rng.random_range(0..i);
        items.swap(i - 1, j);
    }
}

/// Deterministic deck builder seeded once and reused for every deal, so one
/// seed reproduces the whole sequence of boards across restarts.
///
/// # Examples
///
/// ```
/// use memora_engine::cards::default_kinds;
/// use memora_engine::deck::Dealer;
///
/// let mut a = Dealer::new_with_seed(42);
/// let mut b = Dealer::new_with_seed(42);
/// assert_eq!(a.deal(&default_kinds()).unwrap(), b.deal(&default_kinds()).unwrap());
/// ```
#[derive(Debug)]
pub struct Dealer {
    rng: ChaCha20Rng,
    seed: u64,
}

impl Dealer {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Dealer seeded from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new_with_seed(rand::random())
    }

    pub fn deal(&mut self, kinds: &[CardKind]) -> Result<Board, DeckError> {
        build_deck(kinds, &mut self.rng)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::default_kinds;

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut v: Vec<u32> = (0..20).collect();
        shuffle(&mut v, &mut rng);
        let mut sorted = v.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &mut rng);
        let mut one = vec![9u8];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn layout_requires_pairs() {
        let lion = CardKind::named("lion");
        let fox = CardKind::named("fox");
        let err = Board::from_layout(vec![lion.clone(), fox.clone(), lion.clone()]).unwrap_err();
        assert_eq!(err, DeckError::UnpairedKind { name: "fox".into() });

        let err = Board::from_layout(vec![lion.clone(), lion.clone()]).unwrap_err();
        assert_eq!(err, DeckError::TooFewKinds { found: 1 });

        let board = Board::from_layout(vec![lion.clone(), fox.clone(), fox, lion]).unwrap();
        assert_eq!(board.kind_count(), 2);
        assert_eq!(board.positions_of("lion"), vec![0, 3]);
    }

    #[test]
    fn dealer_keeps_its_seed() {
        let mut d = Dealer::new_with_seed(3);
        d.deal(&default_kinds()).unwrap();
        d.deal(&default_kinds()).unwrap();
        assert_eq!(d.seed(), 3);
    }

    #[test]
    fn board_serializes_as_its_layout() {
        let board = Dealer::new_with_seed(4).deal(&default_kinds()).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert_eq!(back.kind_count(), 6);
    }

    #[test]
    fn deserializing_checks_pairs() {
        let three_of_a_kind = r#"[{"name":"a","asset":""},{"name":"a","asset":""},{"name":"a","asset":""}]"#;
        assert!(serde_json::from_str::<Board>(three_of_a_kind).is_err());

        // a stored kind count is not trusted
        let with_count = r#"{"cards":[{"kind":{"name":"a","asset":""},"position":0}],"kind_count":5}"#;
        assert!(serde_json::from_str::<Board>(with_count).is_err());
    }
}
