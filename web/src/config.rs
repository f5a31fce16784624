use anyhow::Context;
use pairs_core as game;
use serde::Deserialize;

const BUILTIN_CONFIG: &str = include_str!("../assets/pairs.toml");

/// Startup data supplied by the host: the symbols cards are drawn from and the grid for each level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct HostConfig {
    pub symbols: game::SymbolPool,
    #[serde(default)]
    pub presets: game::Presets,
}

impl HostConfig {
    pub(crate) fn builtin() -> anyhow::Result<Self> {
        Self::from_toml(BUILTIN_CONFIG).context("built-in configuration is invalid")
    }

    pub(crate) fn from_toml(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source).context("could not parse host configuration")?;
        config
            .presets
            .validate(&config.symbols)
            .context("a preset cannot be dealt from the symbol pool")?;
        log::debug!(
            "loaded {} symbols, presets: {:?}",
            config.symbols.len(),
            config.presets
        );
        Ok(config)
    }

    pub(crate) fn preset(&self, level: game::Level) -> game::DifficultyPreset {
        self.presets.get(level)
    }
}
