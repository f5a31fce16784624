use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub const fn name(self) -> &'static str {
        use Level::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid dimensions without the level they belong to, the shape stored in host configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub grid_size: u8,
    pub unique_pairs: PairCount,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyPreset {
    pub level: Level,
    pub grid_size: u8,
    pub unique_pairs: PairCount,
}

impl DifficultyPreset {
    pub const fn new(level: Level, grid_size: u8, unique_pairs: PairCount) -> Self {
        Self {
            level,
            grid_size,
            unique_pairs,
        }
    }

    pub const fn easy() -> Self {
        Self::new(Level::Easy, 4, 8)
    }

    pub const fn medium() -> Self {
        Self::new(Level::Medium, 6, 18)
    }

    pub const fn hard() -> Self {
        Self::new(Level::Hard, 8, 32)
    }

    pub const fn total_cards(&self) -> u32 {
        (self.unique_pairs as u32) * 2
    }

    /// Whether every card fits exactly into a `grid_size` by `grid_size` layout.
    pub const fn is_square_layout(&self) -> bool {
        let side = self.grid_size as u32;
        side * side == self.total_cards()
    }

    pub const fn shape(&self) -> GridShape {
        GridShape {
            grid_size: self.grid_size,
            unique_pairs: self.unique_pairs,
        }
    }
}

/// Host mapping from each [`Level`] to the grid it plays on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presets {
    pub easy: GridShape,
    pub medium: GridShape,
    pub hard: GridShape,
}

impl Presets {
    pub const fn get(&self, level: Level) -> DifficultyPreset {
        let shape = match level {
            Level::Easy => self.easy,
            Level::Medium => self.medium,
            Level::Hard => self.hard,
        };
        DifficultyPreset::new(level, shape.grid_size, shape.unique_pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = DifficultyPreset> + '_ {
        Level::ALL.into_iter().map(|level| self.get(level))
    }

    /// Checks every preset against the pool, reporting the first one that cannot be dealt.
    pub fn validate(&self, pool: &SymbolPool) -> Result<()> {
        for preset in self.iter() {
            pool.check_capacity(preset.unique_pairs)?;
            if !preset.is_square_layout() {
                log::warn!(
                    "{} preset deals {} cards onto a {}x{} grid",
                    preset.level,
                    preset.total_cards(),
                    preset.grid_size,
                    preset.grid_size
                );
            }
        }
        Ok(())
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            easy: DifficultyPreset::easy().shape(),
            medium: DifficultyPreset::medium().shape(),
            hard: DifficultyPreset::hard().shape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_presets_fill_their_grids() {
        for preset in Presets::default().iter() {
            assert!(preset.is_square_layout(), "{preset:?}");
        }
        assert_eq!(DifficultyPreset::hard().total_cards(), 64);
    }

    #[test]
    fn presets_lookup_keeps_level() {
        let presets = Presets::default();
        assert_eq!(presets.get(Level::Medium), DifficultyPreset::medium());
        assert_eq!(presets.get(Level::Hard).level, Level::Hard);
    }
}
