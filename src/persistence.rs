// File: src/persistence.rs
use crate::core::types::{Glyph, Settings};
use crate::error::PersistenceError;
use crate::learning::MasteryRecord;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A string key-value store holding one record per key.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<dir>/<key>.json`. Writes go to a temp file in the
/// same directory and are renamed into place, so a crash never leaves a
/// half-written record behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ProgressStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }
        temp_file
            .persist(self.path_for(key))
            .map_err(|e| PersistenceError::Io(e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store, used by tests and by front ends that do not persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The stored session. Field names match the record written by earlier
/// versions of the trainer; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedProgress {
    pub level: u32,
    pub word_index: usize,
    pub letter_index: usize,
    pub learned_chars: BTreeSet<Glyph>,
    pub stats: BTreeMap<Glyph, MasteryRecord>,
    pub settings: Settings,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for PersistedProgress {
    fn default() -> Self {
        Self {
            level: 1,
            word_index: 0,
            letter_index: 0,
            learned_chars: BTreeSet::new(),
            stats: BTreeMap::new(),
            settings: Settings::default(),
            saved_at: None,
        }
    }
}

impl PersistedProgress {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(text)?)
    }
}

pub fn save_progress(
    store: &mut dyn ProgressStore,
    key: &str,
    progress: &PersistedProgress,
) -> Result<(), PersistenceError> {
    store.set(key, &progress.to_json()?)
}

/// `Ok(None)` when nothing was saved yet; an error when the record is unreadable.
pub fn load_progress(
    store: &dyn ProgressStore,
    key: &str,
) -> Result<Option<PersistedProgress>, PersistenceError> {
    match store.get(key)? {
        Some(text) => Ok(Some(PersistedProgress::from_json(&text)?)),
        None => Ok(None),
    }
}

/// The portable subset of progress a learner can copy between devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCode {
    #[serde(rename = "l")]
    pub level: u32,
    #[serde(rename = "c")]
    pub learned_chars: Vec<Glyph>,
    #[serde(rename = "s")]
    pub stats: BTreeMap<Glyph, MasteryRecord>,
}

/// Packs the triple with bincode and renders it as URL-safe base64.
pub fn encode_progress_code(code: &ProgressCode) -> Result<String, PersistenceError> {
    let bytes = bincode::serialize(code)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

pub fn decode_progress_code(text: &str) -> Result<ProgressCode, PersistenceError> {
    let bytes = URL_SAFE_NO_PAD.decode(text.trim())?;
    Ok(bincode::deserialize(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> PersistedProgress {
        let mut stats = BTreeMap::new();
        stats.insert(
            '\u{10C00}',
            MasteryRecord { correct_count: 3, wrong_count: 1, introduced: true },
        );
        PersistedProgress {
            level: 2,
            word_index: 1,
            letter_index: 1,
            learned_chars: ['\u{10C00}', '\u{10C43}'].into_iter().collect(),
            stats,
            settings: Settings { sound_enabled: false, ..Settings::default() },
            saved_at: None,
        }
    }

    #[test]
    fn record_uses_stored_field_names() {
        let json = sample().to_json().unwrap();
        for field in [
            "\"level\"",
            "\"wordIndex\"",
            "\"letterIndex\"",
            "\"learnedChars\"",
            "\"stats\"",
            "\"soundEnabled\"",
            "\"correct\"",
            "\"wrong\"",
            "\"introduced\"",
            "\"savedAt\"",
        ] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let progress = PersistedProgress::from_json(r#"{"wordIndex": 2}"#).unwrap();
        assert_eq!(progress.level, 1);
        assert_eq!(progress.word_index, 2);
        assert!(progress.settings.hints_enabled);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            PersistedProgress::from_json("{not json"),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(load_progress(&store, "p").unwrap(), None);

        let mut progress = sample();
        progress.saved_at = Some(Utc::now());
        save_progress(&mut store, "p", &progress).unwrap();
        let loaded = load_progress(&store, "p").unwrap().unwrap();
        assert_eq!(loaded.level, progress.level);
        assert_eq!(loaded.stats, progress.stats);
        assert_eq!(
            loaded.saved_at.map(|t| t.timestamp_millis()),
            progress.saved_at.map(|t| t.timestamp_millis())
        );

        store.remove("p").unwrap();
        store.remove("p").unwrap();
        assert_eq!(load_progress(&store, "p").unwrap(), None);
    }

    #[test]
    fn bad_code_is_an_encoding_error() {
        assert!(matches!(
            decode_progress_code("***"),
            Err(PersistenceError::Encoding(_))
        ));
        assert!(matches!(
            decode_progress_code("AAAA"),
            Err(PersistenceError::Codec(_))
        ));
    }

    proptest! {
        #[test]
        fn progress_code_round_trips(
            level in 1u32..20,
            learned in proptest::collection::vec(0x10C00u32..0x10C49, 0..12),
            counts in proptest::collection::vec((0x10C00u32..0x10C49, 0u32..500, 0u32..500, any::<bool>()), 0..12),
        ) {
            let learned_chars: Vec<Glyph> = learned.iter().filter_map(|&c| char::from_u32(c)).collect();
            let stats: BTreeMap<Glyph, MasteryRecord> = counts
                .iter()
                .filter_map(|&(c, correct, wrong, introduced)| {
                    char::from_u32(c).map(|g| (g, MasteryRecord { correct_count: correct, wrong_count: wrong, introduced }))
                })
                .collect();
            let code = ProgressCode { level, learned_chars, stats };
            let text = encode_progress_code(&code).unwrap();
            prop_assert_eq!(decode_progress_code(&text).unwrap(), code);
        }
    }
}
