use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Structured payload of a finished round, formatting is left to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub level: Level,
    pub moves: MoveCount,
    pub score: Score,
}

/// Semantic notifications pushed from the engine to whoever renders the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    DeckReady(Vec<DealtCard>),
    CardFlipped(Position),
    CardsMatched([Position; 2]),
    /// The pair stays face up until the matching `MismatchResolved`.
    CardsMismatched([Position; 2]),
    MismatchResolved([Position; 2]),
    MoveCountChanged(MoveCount),
    ScoreChanged(Score),
    RoundComplete(RoundSummary),
}

pub trait RoundObserver {
    fn notify(&mut self, event: RoundEvent);
}

impl RoundObserver for Vec<RoundEvent> {
    fn notify(&mut self, event: RoundEvent) {
        self.push(event);
    }
}

impl RoundObserver for () {
    fn notify(&mut self, _event: RoundEvent) {}
}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn notify(&mut self, event: RoundEvent) {
        (**self).notify(event);
    }
}
