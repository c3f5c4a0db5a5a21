//! Save / load of game state as RON.
//!
//! A save records the player pose, the world seed, and the list of walls the
//! player destroyed. Everything else is regenerated from the seed on load.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("save encode error: {0}")]
    Encode(#[from] ron::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSave {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSave {
    #[serde(default)]
    pub seed: u64,
    /// Destroyed wall keys as ((x1, z1), (x2, z2)) grid endpoints.
    #[serde(default)]
    pub destroyed_walls: Vec<((i32, i32), (i32, i32))>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSave {
    #[serde(default)]
    pub play_time: f64,
}

/// Complete serialized game state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub player: PlayerSave,
    #[serde(default)]
    pub world: WorldSave,
    #[serde(default)]
    pub stats: StatsSave,
}

impl SaveData {
    pub fn write_to(&self, path: &Path) -> Result<(), SaveError> {
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, SaveError> {
        let data = std::fs::read_to_string(path)?;
        let save: SaveData = ron::from_str(&data)?;
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_round_trips() {
        let save = SaveData {
            player: PlayerSave {
                x: 12.0,
                y: 0.0,
                z: -340.0,
                yaw: 1.2,
                pitch: -0.3,
            },
            world: WorldSave {
                seed: 42,
                destroyed_walls: vec![((0, 0), (200, 0)), ((200, 0), (200, 200))],
            },
            stats: StatsSave { play_time: 61.5 },
        };
        let s = ron::ser::to_string_pretty(&save, ron::ser::PrettyConfig::default()).unwrap();
        let back: SaveData = ron::from_str(&s).unwrap();
        assert_eq!(back.world.seed, 42);
        assert_eq!(back.world.destroyed_walls.len(), 2);
        assert!((back.player.z - -340.0).abs() < 1e-6);
    }

    /// Missing sections fall back to defaults instead of failing the load.
    #[test]
    fn partial_save_fills_defaults() {
        let save: SaveData = ron::from_str("(world: (seed: 7))").unwrap();
        assert_eq!(save.world.seed, 7);
        assert!(save.world.destroyed_walls.is_empty());
        assert_eq!(save.player.x, 0.0);
        assert_eq!(save.stats.play_time, 0.0);
    }

    #[test]
    fn garbage_save_is_an_error() {
        assert!(ron::from_str::<SaveData>("not a save at all {{{").is_err());
    }
}
