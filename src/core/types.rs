// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A single glyph of the script. Every Old Turkic letter is one scalar value.
pub type Glyph = char;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterKind {
    Vowel,
    Consonant,
    Compound,
    Syllable,
}

/// Vowel-harmony class of a consonant. Non-polar letters pair with any vowel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    None,
    Back,
    Front,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetEntry {
    pub glyph: Glyph,
    /// Latin renderings in declaration order, e.g. `["AB", "B"]`.
    pub latin_forms: Vec<String>,
    pub sound: String,
    pub hint: String,
    pub kind: LetterKind,
    pub polarity: Polarity,
}

impl AlphabetEntry {
    /// The Latin forms joined the way the learner sees them ("AB/B").
    pub fn latin_label(&self) -> String {
        self.latin_forms.join("/")
    }

    /// Whether this letter belongs on the alphabet bar and in the stats view.
    pub fn is_basic(&self) -> bool {
        matches!(
            self.kind,
            LetterKind::Vowel | LetterKind::Consonant | LetterKind::Compound
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub script: Vec<Glyph>,
    pub latin: Vec<char>,
    pub meaning: String,
    pub root: Option<String>,
    pub suffix: Option<String>,
}

impl WordEntry {
    /// Number of drillable positions. Always the script length; validation
    /// guarantees there is a Latin letter for each of them.
    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn script_text(&self) -> String {
        self.script.iter().collect()
    }

    pub fn latin_text(&self) -> String {
        self.latin.iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSentence {
    pub script: String,
    pub latin: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub number: u32,
    pub name: String,
    pub description: String,
    pub new_chars: Vec<Glyph>,
    pub words: Vec<WordEntry>,
    pub bonus_sentence: Option<BonusSentence>,
    pub grammar_note: Option<String>,
}

/// Which side of the correspondence the learner is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Script is shown, Latin letters are answered.
    #[default]
    ScriptToLatin,
    /// Latin is shown, script glyphs are answered.
    LatinToScript,
}

impl Direction {
    /// Even word indices drill script to Latin, odd ones the reverse.
    pub fn for_word_index(word_index: usize) -> Self {
        if word_index % 2 == 0 {
            Direction::ScriptToLatin
        } else {
            Direction::LatinToScript
        }
    }
}

/// A submitted answer or an option on the answer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Latin(char),
    Script(Glyph),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Latin(c) | Token::Script(c) => write!(f, "{}", c),
        }
    }
}

/// Upper-cases a Latin letter for comparison. Turkish dotted capital I is
/// already upper case, so only the first mapped scalar is kept.
pub fn fold_latin(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub hints_enabled: bool,
    pub alphabet_bar_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            hints_enabled: true,
            alphabet_bar_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingName {
    SoundEnabled,
    HintsEnabled,
    AlphabetBarEnabled,
}

impl SettingName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoundEnabled => "soundEnabled",
            Self::HintsEnabled => "hintsEnabled",
            Self::AlphabetBarEnabled => "alphabetBarEnabled",
        }
    }
}

impl std::str::FromStr for SettingName {
    type Err = crate::error::DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soundEnabled" => Ok(Self::SoundEnabled),
            "hintsEnabled" => Ok(Self::HintsEnabled),
            "alphabetBarEnabled" => Ok(Self::AlphabetBarEnabled),
            other => Err(crate::error::DrillError::NotFound(format!("setting '{}'", other))),
        }
    }
}

impl Settings {
    pub fn get(&self, name: SettingName) -> bool {
        match name {
            SettingName::SoundEnabled => self.sound_enabled,
            SettingName::HintsEnabled => self.hints_enabled,
            SettingName::AlphabetBarEnabled => self.alphabet_bar_enabled,
        }
    }

    pub fn set(&mut self, name: SettingName, value: bool) {
        match name {
            SettingName::SoundEnabled => self.sound_enabled = value,
            SettingName::HintsEnabled => self.hints_enabled = value,
            SettingName::AlphabetBarEnabled => self.alphabet_bar_enabled = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_alternates_by_parity() {
        assert_eq!(Direction::for_word_index(0), Direction::ScriptToLatin);
        assert_eq!(Direction::for_word_index(1), Direction::LatinToScript);
        assert_eq!(Direction::for_word_index(4), Direction::ScriptToLatin);
    }

    #[test]
    fn fold_latin_keeps_turkish_capitals() {
        assert_eq!(fold_latin('a'), 'A');
        assert_eq!(fold_latin('İ'), 'İ');
        assert_eq!(fold_latin('ş'), 'Ş');
        assert_eq!(fold_latin('ı'), 'I');
    }

    #[test]
    fn setting_names_parse_and_unknown_is_not_found() {
        assert_eq!("hintsEnabled".parse::<SettingName>().unwrap(), SettingName::HintsEnabled);
        assert!("volume".parse::<SettingName>().is_err());
    }
}
