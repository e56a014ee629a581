use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::classifier::Tag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseId(pub u64);

impl fmt::Display for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

/// One trackable unit of spoken practice text.
///
/// `tag` is always derived from `text` by the classifier; the store is the
/// only writer. `confidence` is a heuristic 0-100 counter, not a measured
/// pronunciation score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub id: PhraseId,
    pub text: String,
    pub tag: Tag,
    pub practiced: bool,
    /// Accumulated practice minutes
    #[serde(default)]
    pub practice_time: u32,
    pub confidence: u8,
    /// Completed playbacks
    #[serde(default)]
    pub spoken_count: u32,
    pub last_practiced: Option<DateTime<Utc>>,
    /// False for records straight out of segmentation; true once the user
    /// has shaped the record (edit, split, merge, duplicate).
    #[serde(default)]
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}
