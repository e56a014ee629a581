use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{PhraseBookData, ProgressData, ScriptHistoryData};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phrasr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load and deserialize the phrase book. Returns None if the file exists
    /// but cannot be parsed (schema mismatch / corruption).
    pub fn load_phrase_book(&self) -> Option<PhraseBookData> {
        let path = self.file_path("phrases.json");
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            // No file yet — return fresh default (not a schema mismatch)
            Some(PhraseBookData::default())
        }
    }

    pub fn save_phrase_book(&self, data: &PhraseBookData) -> Result<()> {
        self.save("phrases.json", data)
    }

    pub fn load_progress(&self) -> ProgressData {
        self.load("progress.json")
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save("progress.json", data)
    }

    pub fn load_scripts(&self) -> ScriptHistoryData {
        self.load("scripts.json")
    }

    pub fn save_scripts(&self, data: &ScriptHistoryData) -> Result<()> {
        self.save("scripts.json", data)
    }
}
