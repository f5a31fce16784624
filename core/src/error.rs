use thiserror::Error;

use crate::PairCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Symbol pool has {available} symbols but {required} unique pairs were requested")]
    InsufficientSymbols {
        required: PairCount,
        available: usize,
    },
    #[error("Symbol at index {index} appears more than once in the pool")]
    DuplicateSymbol { index: usize },
    #[error("Symbol at index {index} is empty")]
    InvalidSymbol { index: usize },
    #[error("Deck does not contain every identity exactly twice")]
    InvalidDeck,
}

pub type Result<T> = core::result::Result<T, GameError>;
