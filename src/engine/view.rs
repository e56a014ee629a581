use crate::session::phrase::PhraseRecord;

/// A phrase is "frequent" once it has been spoken more than this many times.
const FREQUENT_SPOKEN_THRESHOLD: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    All,
    Custom,
    Frequent,
}

impl FilterMode {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "all" => Some(FilterMode::All),
            "custom" => Some(FilterMode::Custom),
            "frequent" => Some(FilterMode::Frequent),
            _ => None,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["all", "custom", "frequent"]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Date,
    Alpha,
    Spoken,
    Confidence,
}

impl SortMode {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "date" => Some(SortMode::Date),
            "alpha" => Some(SortMode::Alpha),
            "spoken" => Some(SortMode::Spoken),
            "confidence" => Some(SortMode::Confidence),
            _ => None,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["date", "alpha", "spoken", "confidence"]
    }
}

/// Compute a filtered, sorted copy of the collection for presentation.
///
/// Sorts are stable: within a tie the original collection order is kept.
pub fn view(phrases: &[PhraseRecord], filter: FilterMode, sort: SortMode) -> Vec<PhraseRecord> {
    let mut out: Vec<PhraseRecord> = phrases
        .iter()
        .filter(|p| match filter {
            FilterMode::All => true,
            FilterMode::Custom => p.is_custom,
            FilterMode::Frequent => p.spoken_count > FREQUENT_SPOKEN_THRESHOLD,
        })
        .cloned()
        .collect();

    match sort {
        SortMode::Date => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Alpha => out.sort_by(|a, b| a.text.cmp(&b.text)),
        SortMode::Spoken => out.sort_by(|a, b| b.spoken_count.cmp(&a.spoken_count)),
        SortMode::Confidence => out.sort_by(|a, b| a.confidence.cmp(&b.confidence)),
    }

    out
}
