// src/error.rs
use crate::core::types::Glyph;
use thiserror::Error;

/// Errors surfaced by drill operations. None of them is fatal: callers log and
/// carry on with the session as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrillError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("corrupt persistence: {0}")]
    CorruptPersistence(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurriculumError {
    #[error("glyph {0} is declared more than once in the alphabet")]
    DuplicateGlyph(Glyph),

    #[error("level {found} is out of sequence, expected {expected}")]
    LevelOutOfSequence { expected: u32, found: u32 },

    #[error("level {level} introduces unknown glyph {glyph}")]
    UnknownNewChar { level: u32, glyph: Glyph },

    #[error("glyph {glyph} is introduced by both level {first} and level {second}")]
    IntroducedTwice { glyph: Glyph, first: u32, second: u32 },

    #[error("word '{word}' in level {level} uses unknown glyph {glyph}")]
    UnknownWordGlyph { level: u32, word: String, glyph: Glyph },

    #[error("word '{word}' in level {level} has {latin} Latin letters for {script} glyphs")]
    LengthMismatch {
        level: u32,
        word: String,
        script: usize,
        latin: usize,
    },

    #[error("level {level} has a word with no glyphs")]
    EmptyWord { level: u32 },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress code is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("progress code payload is malformed: {0}")]
    Codec(#[from] bincode::Error),
}

impl From<PersistenceError> for DrillError {
    fn from(e: PersistenceError) -> Self {
        DrillError::CorruptPersistence(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
