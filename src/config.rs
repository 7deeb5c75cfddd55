// src/config.rs
use crate::core::distractor::DEFAULT_OPTION_COUNT;
use crate::core::events::DrillEvent;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_STORAGE_KEY: &str = "orhun_progress";
const APP_DIR: &str = "orhun-trainer";

/// Presentation delays in milliseconds. The engine only uses the advance
/// delays itself; the rest are published for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    pub feedback_ms: u64,
    pub word_advance_ms: u64,
    pub level_advance_ms: u64,
    pub bonus_level_advance_ms: u64,
    pub bonus_display_ms: u64,
    pub level_up_animation_ms: u64,
    pub answer_flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 1500,
            word_advance_ms: 1500,
            level_advance_ms: 2000,
            bonus_level_advance_ms: 4000,
            bonus_display_ms: 3500,
            level_up_animation_ms: 800,
            answer_flash_ms: 500,
        }
    }
}

impl TimingConfig {
    /// Levels that end with a bonus sentence wait longer before moving on.
    pub fn level_advance_delay(&self, has_bonus: bool) -> u64 {
        if has_bonus {
            self.bonus_level_advance_ms
        } else {
            self.level_advance_ms
        }
    }

    /// How long a front end keeps the feedback for `event` on screen before
    /// moving on. Zero for events that need no pause.
    pub fn pause_after(&self, event: &DrillEvent) -> u64 {
        match event {
            DrillEvent::CorrectAnswer { .. } => self.answer_flash_ms,
            DrillEvent::WrongAnswer { .. } => self.feedback_ms,
            DrillEvent::LevelStarted { is_level_up: true, .. } => self.level_up_animation_ms,
            DrillEvent::LevelComplete { bonus_sentence: Some(_) } => self.bonus_display_ms,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrillConfig {
    pub option_count: usize,
    pub storage_key: String,
    pub data_dir: Option<PathBuf>,
    pub timing: TimingConfig,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            option_count: DEFAULT_OPTION_COUNT,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            timing: TimingConfig::default(),
        }
    }
}

impl DrillConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Directory holding the progress store, falling back to the working
    /// directory when the platform has no data directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let mut path = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DrillConfig::from_toml_str("").unwrap();
        assert_eq!(config, DrillConfig::default());
        assert_eq!(config.option_count, 8);
        assert_eq!(config.timing.level_advance_delay(true), 4000);
    }

    #[test]
    fn partial_timing_overrides_keep_other_defaults() {
        let config = DrillConfig::from_toml_str(
            r#"
            optionCount = 6
            dataDir = "/tmp/orhun"

            [timing]
            wordAdvanceMs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.option_count, 6);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/orhun")));
        assert_eq!(config.timing.word_advance_ms, 10);
        assert_eq!(config.timing.level_advance_ms, 2000);
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/tmp/orhun"));
    }

    #[test]
    fn pauses_follow_the_event() {
        use crate::core::types::BonusSentence;
        let timing = TimingConfig::default();
        assert_eq!(timing.pause_after(&DrillEvent::CorrectAnswer { glyph: 'a' }), 500);
        assert_eq!(timing.pause_after(&DrillEvent::WrongAnswer { glyph: 'a' }), 1500);
        assert_eq!(
            timing.pause_after(&DrillEvent::LevelStarted { level: 2, is_level_up: true }),
            800
        );
        assert_eq!(
            timing.pause_after(&DrillEvent::LevelStarted { level: 2, is_level_up: false }),
            0
        );
        let bonus = BonusSentence {
            script: String::new(),
            latin: "TÜRK BODUN".to_string(),
            meaning: String::new(),
        };
        assert_eq!(
            timing.pause_after(&DrillEvent::LevelComplete { bonus_sentence: Some(bonus) }),
            3500
        );
        assert_eq!(timing.pause_after(&DrillEvent::LevelComplete { bonus_sentence: None }), 0);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = DrillConfig::from_toml_str("optionCount = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
