// File: src/core/distractor.rs
use crate::core::curriculum::Curriculum;
use crate::core::types::{fold_latin, Glyph, Token, WordEntry};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::hash::Hash;

/// Number of answer buttons offered per word.
pub const DEFAULT_OPTION_COUNT: usize = 8;

/// Builds a shuffled multiple-choice set.
///
/// Every member of `required` is kept even when there are more of them than
/// `target_size`. Remaining slots are filled from `pool` minus `required`,
/// in random order, and the combined set is shuffled once more so correct
/// answers and distractors cannot be told apart by position.
pub fn build_options<T, R>(required: &[T], pool: &[T], target_size: usize, rng: &mut R) -> Vec<T>
where
    T: Clone + Eq + Hash,
    R: Rng + ?Sized,
{
    let mut seen: HashSet<T> = HashSet::with_capacity(target_size.max(required.len()));
    let mut options: Vec<T> = Vec::with_capacity(target_size.max(required.len()));
    for item in required {
        if seen.insert(item.clone()) {
            options.push(item.clone());
        }
    }

    let mut candidates: Vec<T> = Vec::new();
    for item in pool {
        if seen.insert(item.clone()) {
            candidates.push(item.clone());
        }
    }
    candidates.shuffle(rng);

    let free = target_size.saturating_sub(options.len());
    options.extend(candidates.into_iter().take(free));
    options.shuffle(rng);
    options
}

/// Latin letters a learner can be offered once `glyphs` are known: the first
/// letter of every Latin form, upper-cased. Digraphs such as "NG" only
/// contribute their first letter.
pub fn latin_pool(curriculum: &Curriculum, glyphs: &[Glyph]) -> Vec<char> {
    let mut letters = Vec::new();
    for &glyph in glyphs {
        let Some(entry) = curriculum.entry_by_char(glyph) else {
            continue;
        };
        for form in &entry.latin_forms {
            if let Some(first) = form.chars().next() {
                let letter = fold_latin(first);
                if !letters.contains(&letter) {
                    letters.push(letter);
                }
            }
        }
    }
    letters
}

/// Options for a script-to-Latin word: its Latin letters plus Latin distractors.
pub fn latin_options<R: Rng + ?Sized>(
    curriculum: &Curriculum,
    word: &WordEntry,
    available: &[Glyph],
    target_size: usize,
    rng: &mut R,
) -> Vec<Token> {
    let required: Vec<Token> = word
        .latin
        .iter()
        .map(|&c| Token::Latin(fold_latin(c)))
        .collect();
    let pool: Vec<Token> = latin_pool(curriculum, available)
        .into_iter()
        .map(Token::Latin)
        .collect();
    build_options(&required, &pool, target_size, rng)
}

/// Options for a Latin-to-script word: its glyphs plus introduced glyphs.
pub fn script_options<R: Rng + ?Sized>(
    word: &WordEntry,
    available: &[Glyph],
    target_size: usize,
    rng: &mut R,
) -> Vec<Token> {
    let required: Vec<Token> = word.script.iter().map(|&g| Token::Script(g)).collect();
    let pool: Vec<Token> = available.iter().map(|&g| Token::Script(g)).collect();
    build_options(&required, &pool, target_size, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn required_items_are_never_trimmed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let required: Vec<u32> = (0..12).collect();
        let options = build_options(&required, &[100, 101], 8, &mut rng);
        assert_eq!(options.len(), 12);
        for r in &required {
            assert!(options.contains(r));
        }
    }

    #[test]
    fn small_pool_yields_everything_it_has() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let options = build_options(&['a'], &['a', 'b', 'c'], 8, &mut rng);
        let mut sorted = options.clone();
        sorted.sort();
        assert_eq!(sorted, vec!['a', 'b', 'c']);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let pool: Vec<u32> = (0..30).collect();
        let a = build_options(&[1, 2], &pool, 8, &mut ChaCha8Rng::seed_from_u64(42));
        let b = build_options(&[1, 2], &pool, 8, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn latin_pool_takes_first_letter_of_each_form() {
        let curriculum = Curriculum::builtin();
        // A/E, I/İ, AT/T, ET/T
        let pool = latin_pool(&curriculum, &curriculum.chars_introduced_through(1));
        assert_eq!(pool, vec!['A', 'E', 'I', 'İ', 'T']);
    }

    #[test]
    fn latin_options_for_first_word() {
        let curriculum = Curriculum::builtin();
        let word = curriculum.word(1, 0).unwrap().clone();
        let available = curriculum.chars_introduced_through(1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = latin_options(&curriculum, &word, &available, 8, &mut rng);
        assert_eq!(options.len(), 5);
        assert!(options.contains(&Token::Latin('A')));
        assert!(options.contains(&Token::Latin('T')));
    }

    proptest! {
        #[test]
        fn options_contain_required_without_duplicates(
            required in proptest::collection::vec(0u8..40, 0..10),
            pool in proptest::collection::vec(0u8..40, 0..40),
            size in 0usize..16,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let options = build_options(&required, &pool, size, &mut rng);

            let unique: HashSet<u8> = options.iter().copied().collect();
            prop_assert_eq!(unique.len(), options.len());
            for r in &required {
                prop_assert!(unique.contains(r));
            }

            let required_set: HashSet<u8> = required.iter().copied().collect();
            let union: HashSet<u8> = required.iter().chain(pool.iter()).copied().collect();
            let expected = size.min(union.len()).max(required_set.len());
            prop_assert_eq!(options.len(), expected);
        }
    }
}
