// src/core/events.rs
use crate::core::types::{BonusSentence, Direction, Glyph, SettingName};

/// Audio feedback the sound layer may play. Only emitted while sound is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Start,
    Correct,
    Wrong,
    WordComplete,
    LevelComplete,
}

/// Semantic notifications for the presentation and sound layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    LevelStarted { level: u32, is_level_up: bool },
    WordStarted { direction: Direction },
    CorrectAnswer { glyph: Glyph },
    WrongAnswer { glyph: Glyph },
    WordComplete,
    LevelComplete { bonus_sentence: Option<BonusSentence> },
    CourseComplete,
    Sound(SoundCue),
    Hint { glyph: Glyph, text: String },
    HintHidden,
    AlphabetBarVisibility(bool),
    SettingChanged { name: SettingName, value: bool },
    ProgressReset,
}
