use serde::{Deserialize, Serialize};

use crate::session::phrase::PhraseRecord;

pub const SCHEMA_VERSION: u32 = 1;

/// How many saved scripts to keep around for "load previous".
pub const SCRIPT_HISTORY_LIMIT: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhraseBookData {
    pub schema_version: u32,
    /// Next id to allocate; never reused, even after deletes.
    pub next_id: u64,
    pub phrases: Vec<PhraseRecord>,
}

impl Default for PhraseBookData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_id: 1,
            phrases: Vec::new(),
        }
    }
}

impl PhraseBookData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

/// Daily practice tally. `date` doubles as the last day any phrase was
/// marked practiced; the counter starts over when it is not today.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    /// YYYY-MM-DD of the day `count` belongs to
    pub date: Option<String>,
    pub count: u32,
    pub streak_days: u32,
    pub best_streak: u32,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            date: None,
            count: 0,
            streak_days: 0,
            best_streak: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptHistoryData {
    pub schema_version: u32,
    /// Most recent script last
    pub scripts: Vec<String>,
}

impl Default for ScriptHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scripts: Vec::new(),
        }
    }
}
