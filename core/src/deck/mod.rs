use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rand::Rng;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

pub trait DeckBuilder {
    fn build(self, preset: DifficultyPreset, pool: &SymbolPool) -> Result<Deck>;
}

/// Card identities in deal order, each appearing exactly twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    identities: Vec<CardIdentity>,
}

impl Deck {
    /// Accepts any order in which every identity is known to the pool and appears exactly twice.
    pub fn from_identities(identities: Vec<CardIdentity>, pool: &SymbolPool) -> Result<Self> {
        let mut counts: BTreeMap<CardIdentity, u8> = BTreeMap::new();
        for &identity in &identities {
            if !pool.contains(identity) {
                return Err(GameError::InvalidDeck);
            }
            let count = counts.entry(identity).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(GameError::InvalidDeck);
            }
        }
        if counts.values().any(|&count| count != 2) {
            return Err(GameError::InvalidDeck);
        }

        Ok(Self { identities })
    }

    pub fn identities(&self) -> &[CardIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn pair_count(&self) -> PairCount {
        (self.identities.len() / 2)
            .try_into()
            .unwrap_or(PairCount::MAX)
    }

    /// Lays the deck out as face-down cards, one per slot.
    pub(crate) fn deal(&self) -> Vec<Card> {
        self.identities
            .iter()
            .zip(0..)
            .map(|(&identity, position)| Card::new(position, identity))
            .collect()
    }
}

/// Takes the first `unique_pairs` symbols of the pool, doubles them and shuffles the result.
pub fn build_deck<R: Rng + ?Sized>(
    preset: DifficultyPreset,
    pool: &SymbolPool,
    rng: &mut R,
) -> Result<Deck> {
    let selected = pool.take(preset.unique_pairs)?;
    let mut identities: Vec<CardIdentity> = selected.flat_map(|id| [id, id]).collect();
    shuffle(&mut identities, rng);
    log::trace!("built {} deck with {} cards", preset.level, identities.len());
    Ok(Deck { identities })
}

/// Fisher-Yates: walking down from the end, swap each slot with a uniformly chosen slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
