use core::fmt;
#[cfg(feature = "serde")]
use std::fs::File;
#[cfg(feature = "serde")]
use std::io::BufReader;
#[cfg(feature = "serde")]
use std::path::Path;

use enum_map::enum_map;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::character::{Stat, Stats};
use crate::grid::{OutOfBounds, Position, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub life: i32,
    pub mana: i32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            strength: 7,
            intelligence: 12,
            dexterity: 6,
            life: 100,
            mana: 50,
        }
    }
}

impl From<BaseStats> for Stats {
    fn from(base: BaseStats) -> Self {
        enum_map! {
            Stat::Strength => base.strength,
            Stat::Intelligence => base.intelligence,
            Stat::Dexterity => base.dexterity,
            Stat::Life => base.life,
            Stat::Mana => base.mana,
        }
    }
}

/// Where the exit goes after a cleared maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ExitPolicy {
    /// Corner opposite the spawn, forced to exit even if carved as wall.
    #[default]
    Mirrored,
    /// Opposite corner if open, otherwise random interior cells until one
    /// is open.
    CornerThenInterior,
}

impl core::str::FromStr for ExitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mirrored" => Ok(ExitPolicy::Mirrored),
            "corner-then-interior" => Ok(ExitPolicy::CornerThenInterior),
            _ => Err(format!("unknown exit policy: {}", s)),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    TooSmall(Size),
    InvalidTileSize(f32),
    Spawn(OutOfBounds),
    WallSpawn(Position),
    Io(std::io::Error),
    #[cfg(feature = "serde")]
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooSmall(size) => {
                write!(f, "dungeon must be at least 2x2, got {}", size)
            }
            ConfigError::InvalidTileSize(value) => {
                write!(f, "tile size must be positive, got {}", value)
            }
            ConfigError::Spawn(e) => write!(f, "spawn tile rejected: {}", e),
            ConfigError::WallSpawn((x, y)) => write!(f, "spawn tile ({}, {}) is a wall", x, y),
            ConfigError::Io(e) => write!(f, "failed to open config file: {}", e),
            #[cfg(feature = "serde")]
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Spawn(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            #[cfg(feature = "serde")]
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub size: Size,
    /// World units per tile; the character is one tile wide.
    pub tile_size: f32,
    pub seed: Option<u64>,
    pub base_stats: BaseStats,
    pub exit_policy: ExitPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: Size::new(20, 15),
            tile_size: 40.0,
            seed: None,
            base_stats: BaseStats::default(),
            exit_policy: ExitPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size.width < 2 || self.size.height < 2 {
            return Err(ConfigError::TooSmall(self.size));
        }

        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }

        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: SessionConfig = serde_json::from_reader(BufReader::new(file))?;

        config.validate()?;

        Ok(config)
    }
}
