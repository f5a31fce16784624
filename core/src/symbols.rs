use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered, duplicate-free list of display symbols that card faces are drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolPool {
    symbols: Vec<String>,
}

impl SymbolPool {
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();

        for (index, symbol) in symbols.iter().enumerate() {
            if symbol.trim().is_empty() {
                return Err(GameError::InvalidSymbol { index });
            }
            if symbols[..index].contains(symbol) {
                return Err(GameError::DuplicateSymbol { index });
            }
        }

        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, identity: CardIdentity) -> Option<&str> {
        self.symbols.get(usize::from(identity.0)).map(String::as_str)
    }

    pub fn contains(&self, identity: CardIdentity) -> bool {
        usize::from(identity.0) < self.symbols.len()
    }

    /// The first `count` identities in pool order.
    pub fn take(&self, count: PairCount) -> Result<impl Iterator<Item = CardIdentity> + use<>> {
        self.check_capacity(count)?;
        Ok((0..count).map(CardIdentity))
    }

    pub fn check_capacity(&self, required: PairCount) -> Result<()> {
        if usize::from(required) > self.symbols.len() {
            Err(GameError::InsufficientSymbols {
                required,
                available: self.symbols.len(),
            })
        } else {
            Ok(())
        }
    }
}

impl TryFrom<Vec<String>> for SymbolPool {
    type Error = GameError;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolPool> for Vec<String> {
    fn from(pool: SymbolPool) -> Self {
        pool.symbols
    }
}
