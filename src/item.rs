use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Kind tag of a consumable item.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Primary food: always exactly one on the board, relocated when eaten.
    Apple,
    GoldenApple,
    PoisonedApple,
}

/// Change applied to the snake when an item is eaten.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ItemEffect {
    pub length_delta: i32,
    pub score_delta: i32,
}

impl ItemKind {
    /// Returns true for the always-present food item.
    #[must_use]
    pub fn is_primary(self) -> bool {
        matches!(self, Self::Apple)
    }

    /// Base effect before the difficulty's score multiplier.
    #[must_use]
    pub fn effect(self) -> ItemEffect {
        match self {
            Self::Apple => ItemEffect {
                length_delta: 1,
                score_delta: 10,
            },
            Self::GoldenApple => ItemEffect {
                length_delta: 3,
                score_delta: 50,
            },
            Self::PoisonedApple => ItemEffect {
                length_delta: -2,
                score_delta: -20,
            },
        }
    }

    /// Draws the kind of a due bonus spawn.
    #[must_use]
    pub fn random_bonus<R: Rng + ?Sized>(rng: &mut R, poisoned_chance: f64) -> Self {
        if rng.gen_bool(poisoned_chance) {
            Self::PoisonedApple
        } else {
            Self::GoldenApple
        }
    }
}

/// Item currently placed on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub tile: Tile,
    pub kind: ItemKind,
}

impl Item {
    #[must_use]
    pub fn new(kind: ItemKind, tile: Tile) -> Self {
        Self { tile, kind }
    }

    #[must_use]
    pub fn apple(tile: Tile) -> Self {
        Self::new(ItemKind::Apple, tile)
    }

    #[must_use]
    pub fn golden(tile: Tile) -> Self {
        Self::new(ItemKind::GoldenApple, tile)
    }

    #[must_use]
    pub fn poisoned(tile: Tile) -> Self {
        Self::new(ItemKind::PoisonedApple, tile)
    }

    #[must_use]
    pub fn is_primary(self) -> bool {
        self.kind.is_primary()
    }
}
