use serde::{Deserialize, Serialize};

use crate::*;

/// Per-card lifecycle: `Hidden -> Selected -> {Matched | Hidden}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Selected,
    Matched,
}

impl CardState {
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }

    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Selected | Self::Matched)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub position: Position,
    pub identity: CardIdentity,
    pub state: CardState,
}

impl Card {
    pub const fn new(position: Position, identity: CardIdentity) -> Self {
        Self {
            position,
            identity,
            state: CardState::Hidden,
        }
    }

    pub const fn dealt(&self) -> DealtCard {
        DealtCard {
            position: self.position,
            identity: self.identity,
        }
    }
}

/// What the presentation layer needs to lay out one face-down card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtCard {
    pub position: Position,
    pub identity: CardIdentity,
}
