use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Slot of a card in deal order, starting at zero.
pub type Position = u16;

/// Count type used for unique pairs and matched pairs.
pub type PairCount = u16;

/// Number of completed two-card selections in a round.
pub type MoveCount = u32;

pub type Score = u32;

/// Points awarded for each matched pair.
pub const MATCH_POINTS: Score = 10;

/// Points taken away for each mismatch, floored at zero.
pub const MISMATCH_PENALTY: Score = 2;

/// How long a mismatched pair stays face up before it is turned back.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1200);

/// Opaque card face, the index of a symbol in the [`SymbolPool`](crate::SymbolPool).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardIdentity(pub u16);

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one dealt round, used to recognize stale deferred resets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundGeneration(pub u32);

impl RoundGeneration {
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
