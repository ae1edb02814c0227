use serde::{Deserialize, Serialize};
use std::fmt;

/// A matching category such as "lion". Two cards of every kind are dealt.
/// The asset reference is carried through for the presentation layer and is
/// never interpreted by the engine.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardKind {
    /// Identifier compared when evaluating a pair
    pub name: String,
    /// Opaque display asset reference (image path, sprite id, ...)
    pub asset: String,
}

impl CardKind {
    pub fn new(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: asset.into(),
        }
    }

    /// Kind whose asset reference is derived from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let asset = format!("images/{}.png", name);
        Self { name, asset }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A card placed on the board. Immutable once dealt for a round.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// The pair category of this card
    pub kind: CardKind,
    /// Index of this card in the board sequence
    pub position: usize,
}

/// The six animal kinds the game ships with.
pub fn default_kinds() -> Vec<CardKind> {
    vec![
        CardKind::new("lion", "images/lion_616412.png"),
        CardKind::new("gorilla", "images/gorilla_616543.png"),
        CardKind::new("panda", "images/panda_616563.png"),
        CardKind::new("bear", "images/bear_616540.png"),
        CardKind::new("fox", "images/fox_616519.png"),
        CardKind::new("deer", "images/deer_616530.png"),
    ]
}
