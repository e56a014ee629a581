use chrono::{DateTime, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::config::Config;
use crate::engine::classifier;
use crate::engine::segmenter;
use crate::session::phrase::{PhraseId, PhraseRecord};
use crate::store::json_store::JsonStore;
use crate::store::schema::{PhraseBookData, ProgressData, SCHEMA_VERSION, SCRIPT_HISTORY_LIMIT};

/// Injectable time source so tests can pin or advance the day.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no usable phrases in the batch")]
    EmptyBatch,
    #[error("phrase text is empty")]
    EmptyText,
    #[error("phrase {0} not found")]
    NotFound(PhraseId),
    #[error("phrase {0} has only one sentence")]
    Unsplittable(PhraseId),
    #[error("phrase {next_id} does not immediately follow phrase {id}")]
    NoNeighbor { id: PhraseId, next_id: PhraseId },
    #[error("failed to persist phrase data: {0}")]
    Persist(anyhow::Error),
}

/// Owner of the phrase collection and the daily-progress tally.
///
/// Every mutation completes atomically and is persisted (when a JsonStore is
/// attached) before it is acknowledged to the caller. Nothing outside this
/// type writes a PhraseRecord.
pub struct PhraseStore {
    phrases: Vec<PhraseRecord>,
    next_id: u64,
    progress: ProgressData,
    config: Config,
    rng: SmallRng,
    clock: Box<dyn Clock>,
    store: Option<JsonStore>,
}

impl PhraseStore {
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new().ok();
        Self::with_parts(
            config,
            store,
            SmallRng::from_entropy(),
            Box::new(SystemClock),
        )
    }

    /// Full-control constructor used by tests and the CLI alike.
    pub fn with_parts(
        config: Config,
        store: Option<JsonStore>,
        rng: SmallRng,
        clock: Box<dyn Clock>,
    ) -> Self {
        let (book, progress) = match store {
            Some(ref s) => {
                // load_phrase_book returns None if the file exists but can't
                // be parsed; a stale schema_version also forces a reset.
                let book = match s.load_phrase_book() {
                    Some(b) if !b.needs_reset() => b,
                    _ => PhraseBookData::default(),
                };
                let progress = s.load_progress();
                let progress = if progress.schema_version == SCHEMA_VERSION {
                    progress
                } else {
                    ProgressData::default()
                };
                (book, progress)
            }
            None => (PhraseBookData::default(), ProgressData::default()),
        };

        // Guards against a hand-edited next_id falling behind existing ids
        let max_id = book.phrases.iter().map(|p| p.id.0).max().unwrap_or(0);
        let next_id = book.next_id.max(max_id + 1);

        Self {
            phrases: book.phrases,
            next_id,
            progress,
            config,
            rng,
            clock,
            store,
        }
    }

    pub fn phrases(&self) -> &[PhraseRecord] {
        &self.phrases
    }

    pub fn progress_data(&self) -> &ProgressData {
        &self.progress
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get(&self, id: PhraseId) -> Option<&PhraseRecord> {
        self.phrases.iter().find(|p| p.id == id)
    }

    fn index_of(&self, id: PhraseId) -> Result<usize, StoreError> {
        self.phrases
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn alloc_id(&mut self) -> PhraseId {
        let id = PhraseId(self.next_id);
        self.next_id += 1;
        id
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(ref store) = self.store {
            let book = PhraseBookData {
                schema_version: SCHEMA_VERSION,
                next_id: self.next_id,
                phrases: self.phrases.clone(),
            };
            store.save_phrase_book(&book).map_err(StoreError::Persist)?;
            store
                .save_progress(&self.progress)
                .map_err(StoreError::Persist)?;
        }
        Ok(())
    }

    /// Build one record per non-empty text, in order. Starting confidence is
    /// a random value in [0, initial_confidence_max).
    pub fn create(&mut self, texts: &[String]) -> Result<Vec<PhraseRecord>, StoreError> {
        let usable: Vec<String> = texts
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if usable.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let now = self.clock.now();
        let confidence_max = self.config.initial_confidence_max.max(1);
        let mut created = Vec::with_capacity(usable.len());
        for text in usable {
            let tag = classifier::classify(&text);
            let record = PhraseRecord {
                id: self.alloc_id(),
                text,
                tag,
                practiced: false,
                practice_time: 0,
                confidence: self.rng.gen_range(0..confidence_max),
                spoken_count: 0,
                last_practiced: None,
                is_custom: false,
                created_at: now,
            };
            self.phrases.push(record.clone());
            created.push(record);
        }
        self.save()?;
        Ok(created)
    }

    /// Fold a completed playback into the phrase's statistics.
    /// Confidence only ever rises here, capped at 100.
    pub fn record_play(
        &mut self,
        id: PhraseId,
        elapsed_secs: f64,
    ) -> Result<PhraseRecord, StoreError> {
        let now = self.clock.now();
        let gain = self.config.play_confidence_gain;
        let idx = self.index_of(id)?;
        let updated = {
            let p = &mut self.phrases[idx];
            p.practice_time += (elapsed_secs / 60.0).round() as u32;
            p.spoken_count += 1;
            p.last_practiced = Some(now);
            p.confidence = p.confidence.saturating_add(gain).min(100);
            p.clone()
        };
        self.save()?;
        Ok(updated)
    }

    /// Flip the practiced flag and move the daily counter with it.
    ///
    /// Un-practicing only clears the flag; confidence and practice time are
    /// deliberately left alone (one-way ratchet).
    pub fn toggle_practiced(&mut self, id: PhraseId) -> Result<PhraseRecord, StoreError> {
        let now = self.clock.now();
        let floor = self.config.practiced_confidence_floor;
        let idx = self.index_of(id)?;
        let updated = {
            let p = &mut self.phrases[idx];
            p.practiced = !p.practiced;
            if p.practiced {
                p.last_practiced = Some(now);
                p.confidence = p.confidence.max(floor);
            }
            p.clone()
        };

        let today = now.format("%Y-%m-%d").to_string();
        if updated.practiced {
            if self.progress.date.as_deref() != Some(&today) {
                if let Some(ref last) = self.progress.date {
                    let yesterday = (now - chrono::Duration::days(1))
                        .format("%Y-%m-%d")
                        .to_string();
                    if last == &yesterday {
                        self.progress.streak_days += 1;
                    } else {
                        self.progress.streak_days = 1;
                    }
                } else {
                    self.progress.streak_days = 1;
                }
                self.progress.best_streak = self.progress.best_streak.max(self.progress.streak_days);
                self.progress.date = Some(today);
                self.progress.count = 0;
            }
            self.progress.count = (self.progress.count + 1).min(self.config.daily_goal);
        } else if self.progress.date.as_deref() == Some(&today) {
            self.progress.count = self.progress.count.saturating_sub(1);
        }

        self.save()?;
        Ok(updated)
    }

    /// Replace the text; statistics are untouched but the tag follows.
    pub fn edit(&mut self, id: PhraseId, new_text: &str) -> Result<PhraseRecord, StoreError> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let idx = self.index_of(id)?;
        let updated = {
            let p = &mut self.phrases[idx];
            p.text = trimmed.to_string();
            p.tag = classifier::classify(trimmed);
            p.is_custom = true;
            p.clone()
        };
        self.save()?;
        Ok(updated)
    }

    /// Re-segment a multi-sentence phrase into one record per sentence.
    ///
    /// The original is removed and each part gets a fresh id, an equal share
    /// of the original confidence, and otherwise fresh statistics.
    pub fn split(&mut self, id: PhraseId) -> Result<Vec<PhraseRecord>, StoreError> {
        let idx = self.index_of(id)?;
        let parts = segmenter::segment(&self.phrases[idx].text);
        if parts.len() <= 1 {
            return Err(StoreError::Unsplittable(id));
        }

        let original = self.phrases.remove(idx);
        let now = self.clock.now();
        let share = (original.confidence as usize / parts.len()) as u8;

        let mut created = Vec::with_capacity(parts.len());
        for (i, text) in parts.into_iter().enumerate() {
            let tag = classifier::classify(&text);
            let record = PhraseRecord {
                id: self.alloc_id(),
                text,
                tag,
                practiced: false,
                practice_time: 0,
                confidence: share,
                spoken_count: 0,
                last_practiced: None,
                is_custom: true,
                created_at: now,
            };
            self.phrases.insert(idx + i, record.clone());
            created.push(record);
        }
        self.save()?;
        Ok(created)
    }

    /// Merge a phrase with its immediate successor into one record that
    /// keeps the first id and the earlier created_at.
    pub fn merge(&mut self, id: PhraseId, next_id: PhraseId) -> Result<PhraseRecord, StoreError> {
        let idx = self.index_of(id)?;
        match self.phrases.get(idx + 1) {
            Some(next) if next.id == next_id => {}
            // Covers an absent next_id too: at the last position there is
            // nothing to merge with
            _ => return Err(StoreError::NoNeighbor { id, next_id }),
        }

        let second = self.phrases.remove(idx + 1);
        let merged = {
            let first = &mut self.phrases[idx];
            first.text = format!("{} {}", first.text, second.text);
            first.tag = classifier::classify(&first.text);
            first.practiced = first.practiced || second.practiced;
            first.practice_time += second.practice_time;
            first.spoken_count += second.spoken_count;
            first.confidence = first.confidence.max(second.confidence);
            // First record's timestamp wins when both are set
            first.last_practiced = first.last_practiced.or(second.last_practiced);
            first.is_custom = true;
            first.created_at = first.created_at.min(second.created_at);
            first.clone()
        };
        self.save()?;
        Ok(merged)
    }

    /// Clone a record in place, right after the source, with a new id.
    pub fn duplicate(&mut self, id: PhraseId) -> Result<PhraseRecord, StoreError> {
        let idx = self.index_of(id)?;
        let mut copy = self.phrases[idx].clone();
        copy.id = self.alloc_id();
        copy.created_at = self.clock.now();
        copy.is_custom = true;
        self.phrases.insert(idx + 1, copy.clone());
        self.save()?;
        Ok(copy)
    }

    pub fn delete(&mut self, id: PhraseId) -> Result<PhraseRecord, StoreError> {
        let idx = self.index_of(id)?;
        let removed = self.phrases.remove(idx);
        self.save()?;
        Ok(removed)
    }

    /// Wipe the practice statistics while keeping the phrase itself.
    pub fn reset_stats(&mut self, id: PhraseId) -> Result<PhraseRecord, StoreError> {
        let idx = self.index_of(id)?;
        let updated = {
            let p = &mut self.phrases[idx];
            p.practiced = false;
            p.practice_time = 0;
            p.confidence = 0;
            p.last_practiced = None;
            p.clone()
        };
        self.save()?;
        Ok(updated)
    }

    /// Drop every phrase, e.g. before re-saving a script from scratch.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.phrases.clear();
        self.save()
    }

    /// Remember a raw script for "load previous". Deduplicates and keeps the
    /// most recent SCRIPT_HISTORY_LIMIT entries.
    pub fn remember_script(&self, raw: &str) -> Result<(), StoreError> {
        if let Some(ref store) = self.store {
            let mut history = store.load_scripts();
            history.scripts.retain(|s| s != raw);
            history.scripts.push(raw.to_string());
            if history.scripts.len() > SCRIPT_HISTORY_LIMIT {
                let excess = history.scripts.len() - SCRIPT_HISTORY_LIMIT;
                history.scripts.drain(..excess);
            }
            history.schema_version = SCHEMA_VERSION;
            store.save_scripts(&history).map_err(StoreError::Persist)?;
        }
        Ok(())
    }

    pub fn recent_scripts(&self) -> Vec<String> {
        self.store
            .as_ref()
            .map(|s| s.load_scripts().scripts)
            .unwrap_or_default()
    }
}
