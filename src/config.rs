use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Phrases to mark practiced per day
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Confidence gained per completed playback
    #[serde(default = "default_play_confidence_gain")]
    pub play_confidence_gain: u8,
    /// Minimum confidence after marking a phrase practiced
    #[serde(default = "default_practiced_confidence_floor")]
    pub practiced_confidence_floor: u8,
    /// Exclusive upper bound for the random starting confidence
    #[serde(default = "default_initial_confidence_max")]
    pub initial_confidence_max: u8,
}

fn default_daily_goal() -> u32 {
    12
}
fn default_play_confidence_gain() -> u8 {
    5
}
fn default_practiced_confidence_floor() -> u8 {
    30
}
fn default_initial_confidence_max() -> u8 {
    40
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_goal: default_daily_goal(),
            play_confidence_gain: default_play_confidence_gain(),
            practiced_confidence_floor: default_practiced_confidence_floor(),
            initial_confidence_max: default_initial_confidence_max(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phrasr")
            .join("config.toml")
    }

    /// Clamp hand-edited values into their supported ranges.
    /// Call after deserialization.
    pub fn normalize(&mut self) {
        self.daily_goal = self.daily_goal.max(1);
        self.play_confidence_gain = self.play_confidence_gain.clamp(5, 10);
        self.practiced_confidence_floor = self.practiced_confidence_floor.clamp(30, 40);
        self.initial_confidence_max = self.initial_confidence_max.clamp(1, 40);
    }
}
