use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Deals a uniformly shuffled deck from a seed, the same seed always giving the same deal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomDeckBuilder {
    seed: u64,
}

impl RandomDeckBuilder {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckBuilder for RandomDeckBuilder {
    fn build(self, preset: DifficultyPreset, pool: &SymbolPool) -> Result<Deck> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        build_deck(preset, pool, &mut rng)
    }
}
