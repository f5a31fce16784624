use super::*;

/// Deals exactly the given order, for replays and scripted rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDeckBuilder {
    identities: Vec<CardIdentity>,
}

impl FixedDeckBuilder {
    pub fn new(identities: impl IntoIterator<Item = CardIdentity>) -> Self {
        Self {
            identities: identities.into_iter().collect(),
        }
    }
}

impl DeckBuilder for FixedDeckBuilder {
    fn build(self, preset: DifficultyPreset, pool: &SymbolPool) -> Result<Deck> {
        pool.check_capacity(preset.unique_pairs)?;

        if self.identities.len() as u32 != preset.total_cards() {
            return Err(GameError::InvalidDeck);
        }

        Deck::from_identities(self.identities, pool)
    }
}
