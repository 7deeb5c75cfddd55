// File: src/core/curriculum.rs
use crate::core::alphabet::builtin_alphabet;
use crate::core::levels::builtin_levels;
use crate::core::types::{AlphabetEntry, Glyph, LevelDefinition, WordEntry};
use crate::error::CurriculumError;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Immutable course data: the letter table and the ordered levels.
/// Built once and shared read-only by the drill engine.
#[derive(Debug, Clone)]
pub struct Curriculum {
    entries: Vec<AlphabetEntry>,
    levels: Vec<LevelDefinition>,
    by_glyph: HashMap<Glyph, usize>,
}

/// A word whose Latin spelling is longer than its script. It stays drillable;
/// the trailing Latin letters are never asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthWarning {
    pub level: u32,
    pub word: String,
    pub script: usize,
    pub latin: usize,
}

impl Curriculum {
    /// Validates and builds a curriculum. Structural problems are fatal;
    /// over-long Latin spellings are only logged.
    pub fn new(
        entries: Vec<AlphabetEntry>,
        levels: Vec<LevelDefinition>,
    ) -> Result<Self, CurriculumError> {
        let mut by_glyph = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_glyph.insert(entry.glyph, idx).is_some() {
                return Err(CurriculumError::DuplicateGlyph(entry.glyph));
            }
        }

        let curriculum = Self { entries, levels, by_glyph };
        for warning in curriculum.validate()? {
            warn!(
                level = warning.level,
                word = %warning.word,
                script = warning.script,
                latin = warning.latin,
                "word has more Latin letters than glyphs, extra letters are ignored"
            );
        }
        Ok(curriculum)
    }

    /// The full Old Turkic course shipped with the crate.
    pub fn builtin() -> Self {
        // The shipped tables are covered by tests, so validation cannot fail here.
        match Self::new(builtin_alphabet(), builtin_levels()) {
            Ok(curriculum) => curriculum,
            Err(e) => unreachable!("built-in curriculum is invalid: {}", e),
        }
    }

    /// Checks level ordering, glyph ownership and word spelling.
    pub fn validate(&self) -> Result<Vec<LengthWarning>, CurriculumError> {
        let mut introduced_by: HashMap<Glyph, u32> = HashMap::new();
        let mut warnings = Vec::new();

        for (idx, level) in self.levels.iter().enumerate() {
            let expected = idx as u32 + 1;
            if level.number != expected {
                return Err(CurriculumError::LevelOutOfSequence {
                    expected,
                    found: level.number,
                });
            }

            for &glyph in &level.new_chars {
                if !self.by_glyph.contains_key(&glyph) {
                    return Err(CurriculumError::UnknownNewChar { level: level.number, glyph });
                }
                if let Some(&first) = introduced_by.get(&glyph) {
                    return Err(CurriculumError::IntroducedTwice {
                        glyph,
                        first,
                        second: level.number,
                    });
                }
                introduced_by.insert(glyph, level.number);
            }

            for word in &level.words {
                if word.is_empty() {
                    return Err(CurriculumError::EmptyWord { level: level.number });
                }
                if let Some(&glyph) = word.script.iter().find(|g| !self.by_glyph.contains_key(g)) {
                    return Err(CurriculumError::UnknownWordGlyph {
                        level: level.number,
                        word: word.latin_text(),
                        glyph,
                    });
                }
                if word.latin.len() < word.script.len() {
                    return Err(CurriculumError::LengthMismatch {
                        level: level.number,
                        word: word.latin_text(),
                        script: word.script.len(),
                        latin: word.latin.len(),
                    });
                }
                if word.latin.len() > word.script.len() {
                    warnings.push(LengthWarning {
                        level: level.number,
                        word: word.latin_text(),
                        script: word.script.len(),
                        latin: word.latin.len(),
                    });
                }
            }
        }
        Ok(warnings)
    }

    pub fn all_entries(&self) -> &[AlphabetEntry] {
        &self.entries
    }

    pub fn entry_by_char(&self, glyph: Glyph) -> Option<&AlphabetEntry> {
        self.by_glyph.get(&glyph).map(|&idx| &self.entries[idx])
    }

    /// First entry, in table order, with a Latin form containing `text`
    /// case-insensitively. "A" therefore resolves to the vowel, never to "AB".
    pub fn entry_by_latin_prefix(&self, text: &str) -> Option<&AlphabetEntry> {
        let needle = text.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            entry
                .latin_forms
                .iter()
                .any(|form| form.to_lowercase().contains(&needle))
        })
    }

    /// Vowels, consonants and compound letters, in table order.
    pub fn basic_alphabet(&self) -> impl Iterator<Item = &AlphabetEntry> {
        self.entries.iter().filter(|e| e.is_basic())
    }

    pub fn levels_in_order(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn level_info(&self, level: u32) -> Option<&LevelDefinition> {
        let idx = (level as usize).checked_sub(1)?;
        self.levels.get(idx)
    }

    pub fn words_for_level(&self, level: u32) -> &[WordEntry] {
        self.level_info(level)
            .map(|l| l.words.as_slice())
            .unwrap_or(&[])
    }

    pub fn word(&self, level: u32, word_index: usize) -> Option<&WordEntry> {
        self.words_for_level(level).get(word_index)
    }

    /// Glyphs introduced by levels `1..=level`, in the order they were introduced.
    pub fn chars_introduced_through(&self, level: u32) -> Vec<Glyph> {
        self.levels
            .iter()
            .take_while(|l| l.number <= level)
            .flat_map(|l| l.new_chars.iter().copied())
            .collect()
    }

    pub fn char_set_through(&self, level: u32) -> BTreeSet<Glyph> {
        self.chars_introduced_through(level).into_iter().collect()
    }

    pub fn total_levels(&self) -> u32 {
        self.levels.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LetterKind, Polarity};

    fn entry(glyph: Glyph, forms: &[&str]) -> AlphabetEntry {
        AlphabetEntry {
            glyph,
            latin_forms: forms.iter().map(|s| s.to_string()).collect(),
            sound: String::new(),
            hint: String::new(),
            kind: LetterKind::Consonant,
            polarity: Polarity::None,
        }
    }

    fn level(number: u32, new_chars: &[Glyph], words: &[(&str, &str)]) -> LevelDefinition {
        LevelDefinition {
            number,
            name: format!("L{}", number),
            description: String::new(),
            new_chars: new_chars.to_vec(),
            words: words
                .iter()
                .map(|(script, latin)| WordEntry {
                    script: script.chars().collect(),
                    latin: latin.chars().collect(),
                    meaning: String::new(),
                    root: None,
                    suffix: None,
                })
                .collect(),
            bonus_sentence: None,
            grammar_note: None,
        }
    }

    #[test]
    fn builtin_course_is_valid() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.total_levels(), 11);
        let warnings = curriculum.validate().unwrap();
        let words: Vec<&str> = warnings.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["TENGRİ", "BODUNUM"]);
    }

    #[test]
    fn introduced_chars_grow_monotonically() {
        let curriculum = Curriculum::builtin();
        let mut previous = BTreeSet::new();
        for n in 1..=curriculum.total_levels() {
            let current = curriculum.char_set_through(n);
            assert!(previous.is_subset(&current));
            let expected: BTreeSet<Glyph> = curriculum.levels_in_order()[..n as usize]
                .iter()
                .flat_map(|l| l.new_chars.iter().copied())
                .collect();
            assert_eq!(current, expected);
            previous = current;
        }
    }

    #[test]
    fn out_of_range_level_has_no_words() {
        let curriculum = Curriculum::builtin();
        assert!(curriculum.words_for_level(0).is_empty());
        assert!(curriculum.words_for_level(99).is_empty());
        assert!(curriculum.level_info(12).is_none());
    }

    #[test]
    fn latin_lookup_takes_first_table_match() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.entry_by_latin_prefix("a").unwrap().glyph, '\u{10C00}');
        assert_eq!(curriculum.entry_by_latin_prefix("eb").unwrap().glyph, '\u{10C0B}');
        assert!(curriculum.entry_by_latin_prefix("x").is_none());
        assert!(curriculum.entry_by_latin_prefix("").is_none());
    }

    #[test]
    fn basic_alphabet_skips_syllable_letters() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.basic_alphabet().count(), 34);
    }

    #[test]
    fn duplicate_glyph_is_rejected() {
        let result = Curriculum::new(vec![entry('a', &["A"]), entry('a', &["B"])], vec![]);
        assert_eq!(result.unwrap_err(), CurriculumError::DuplicateGlyph('a'));
    }

    #[test]
    fn levels_must_start_at_one_and_be_contiguous() {
        let result = Curriculum::new(vec![entry('a', &["A"])], vec![level(2, &['a'], &[])]);
        assert_eq!(
            result.unwrap_err(),
            CurriculumError::LevelOutOfSequence { expected: 1, found: 2 }
        );
    }

    #[test]
    fn glyph_introduced_twice_is_rejected() {
        let result = Curriculum::new(
            vec![entry('a', &["A"])],
            vec![level(1, &['a'], &[]), level(2, &['a'], &[])],
        );
        assert!(matches!(result, Err(CurriculumError::IntroducedTwice { glyph: 'a', .. })));
    }

    #[test]
    fn short_latin_spelling_is_fatal() {
        let result = Curriculum::new(
            vec![entry('a', &["A"]), entry('b', &["B"])],
            vec![level(1, &['a', 'b'], &[("ab", "A")])],
        );
        assert!(matches!(result, Err(CurriculumError::LengthMismatch { script: 2, latin: 1, .. })));
    }

    #[test]
    fn word_without_glyphs_is_rejected() {
        let result = Curriculum::new(
            vec![entry('a', &["A"])],
            vec![level(1, &['a'], &[("a", "A")]), level(2, &[], &[("", "A")])],
        );
        assert_eq!(result.unwrap_err(), CurriculumError::EmptyWord { level: 2 });
    }

    #[test]
    fn unknown_word_glyph_is_rejected() {
        let result = Curriculum::new(
            vec![entry('a', &["A"])],
            vec![level(1, &['a'], &[("az", "AZ")])],
        );
        assert!(matches!(result, Err(CurriculumError::UnknownWordGlyph { glyph: 'z', .. })));
    }
}
