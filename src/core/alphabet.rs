// src/core/alphabet.rs
//! The built-in Old Turkic (Orkhon) letter table.
use crate::core::types::{AlphabetEntry, Glyph, LetterKind, Polarity};

pub(crate) struct AlphabetRow {
    glyph: Glyph,
    latin: &'static [&'static str],
    sound: &'static str,
    hint: &'static str,
    kind: LetterKind,
    polarity: Polarity,
}

const fn row(
    glyph: Glyph,
    latin: &'static [&'static str],
    sound: &'static str,
    hint: &'static str,
    kind: LetterKind,
    polarity: Polarity,
) -> AlphabetRow {
    AlphabetRow { glyph, latin, sound, hint, kind, polarity }
}

use LetterKind::{Compound, Consonant, Syllable, Vowel};
use Polarity::{Back, Front};

/// Declaration order matters: Latin lookups return the first match.
pub(crate) static ALPHABET: &[AlphabetRow] = &[
    // Vowels
    row('\u{10C00}', &["A", "E"], "a", "Kalın ünsüzlerle A, ince ünsüzlerle E sesi verir", Vowel, Polarity::None),
    row('\u{10C03}', &["I", "İ"], "i", "Kalın ünsüzlerle I, ince ünsüzlerle İ sesi verir", Vowel, Polarity::None),
    row('\u{10C06}', &["O", "U"], "o", "İlk hecede O, sonraki hecelerde U sesi verir", Vowel, Polarity::None),
    row('\u{10C07}', &["Ö", "Ü"], "ö", "İlk hecede Ö, sonraki hecelerde Ü sesi verir", Vowel, Polarity::None),
    // Polar consonants, back/front pairs
    row('\u{10C09}', &["AB", "B"], "b", "Kalın heceli B sesi", Consonant, Back),
    row('\u{10C0B}', &["EB", "B"], "b", "İnce heceli B sesi", Consonant, Front),
    row('\u{10C11}', &["AD", "D"], "d", "Kalın heceli D sesi", Consonant, Back),
    row('\u{10C13}', &["ED", "D"], "d", "İnce heceli D sesi", Consonant, Front),
    row('\u{10C0D}', &["AG", "Ğ"], "g", "Kalın G/Ğ sesi", Consonant, Back),
    row('\u{10C0F}', &["EG", "G"], "g", "İnce G sesi", Consonant, Front),
    row('\u{10C34}', &["AQ", "K"], "k", "Kalın K (Kaf) sesi", Consonant, Back),
    row('\u{10C1A}', &["EK", "K"], "k", "İnce K sesi", Consonant, Front),
    row('\u{10C1E}', &["AL", "L"], "l", "Kalın L sesi", Consonant, Back),
    row('\u{10C20}', &["EL", "L"], "l", "İnce L sesi", Consonant, Front),
    row('\u{10C23}', &["AN", "N"], "n", "Kalın N sesi", Consonant, Back),
    row('\u{10C24}', &["EN", "N"], "n", "İnce N sesi", Consonant, Front),
    row('\u{10C3A}', &["AR", "R"], "r", "Kalın R sesi", Consonant, Back),
    row('\u{10C3C}', &["ER", "R"], "r", "İnce R sesi", Consonant, Front),
    row('\u{10C3D}', &["AS", "S"], "s", "Kalın S sesi", Consonant, Back),
    row('\u{10C3E}', &["ES", "S"], "s", "İnce S sesi", Consonant, Front),
    row('\u{10C43}', &["AT", "T"], "t", "Kalın T sesi - daire içinde çarpı", Consonant, Back),
    row('\u{10C45}', &["ET", "T"], "t", "İnce T sesi - h şeklinde", Consonant, Front),
    row('\u{10C16}', &["AY", "Y"], "y", "Kalın Y sesi - D harfi gibi", Consonant, Back),
    row('\u{10C18}', &["EY", "Y"], "y", "İnce Y sesi - 9 rakamı gibi", Consonant, Front),
    // Non-polar consonants
    row('\u{10C32}', &["Ç"], "ç", "Ç sesi - kalın-ince ayrımı yok, tüm ünlülerle kullanılır", Consonant, Polarity::None),
    row('\u{10C22}', &["M"], "m", "M sesi - kalın-ince ayrımı yok, tüm ünlülerle kullanılır", Consonant, Polarity::None),
    row('\u{10C2F}', &["P"], "p", "P sesi - kalın-ince ayrımı yok, tüm ünlülerle kullanılır", Consonant, Polarity::None),
    row('\u{10C41}', &["Ş"], "ş", "Ş sesi - kalın-ince ayrımı yok, tüm ünlülerle kullanılır", Consonant, Polarity::None),
    row('\u{10C14}', &["Z"], "z", "Z sesi - kalın-ince ayrımı yok, tüm ünlülerle kullanılır", Consonant, Polarity::None),
    // Compound letters
    row('\u{10C28}', &["NÇ"], "nç", "NÇ birleşik sesi verir", Compound, Polarity::None),
    row('\u{10C26}', &["ND", "NT"], "nt", "ND veya NT birleşik sesi verir", Compound, Polarity::None),
    row('\u{10C21}', &["LD", "LT"], "lt", "LD veya LT birleşik sesi verir", Compound, Polarity::None),
    row('\u{10C2D}', &["NG", "Ñ"], "ng", "NG (genizden) sesi verir - TeÑRİ (Tanrı)", Compound, Polarity::None),
    row('\u{10C2A}', &["NY", "Ñ"], "ny", "NY birleşik sesi verir", Compound, Polarity::None),
    // Syllable letters
    row('\u{10C31}', &["İÇ"], "iç", "Sadece 'iç' yazarken kullanılır", Syllable, Polarity::None),
    row('\u{10C36}', &["IK", "KI"], "ık", "'ık, kı' heceleri yazarken kullanılır", Syllable, Polarity::None),
    row('\u{10C38}', &["OK", "UK", "KO", "KU"], "ok", "'ok, uk, ko, ku' heceleri yazarken kullanılır", Syllable, Polarity::None),
    row('\u{10C1C}', &["ÖK", "ÜK", "KÖ", "KÜ"], "ök", "'ök, ük, kö, kü' heceleri yazarken kullanılır", Syllable, Polarity::None),
];

impl AlphabetRow {
    pub(crate) fn to_entry(&self) -> AlphabetEntry {
        AlphabetEntry {
            glyph: self.glyph,
            latin_forms: self.latin.iter().map(|s| s.to_string()).collect(),
            sound: self.sound.to_string(),
            hint: self.hint.to_string(),
            kind: self.kind,
            polarity: self.polarity,
        }
    }
}

pub fn builtin_alphabet() -> Vec<AlphabetEntry> {
    ALPHABET.iter().map(AlphabetRow::to_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_every_letter_once() {
        let entries = builtin_alphabet();
        assert_eq!(entries.len(), 38);
        let unique: HashSet<Glyph> = entries.iter().map(|e| e.glyph).collect();
        assert_eq!(unique.len(), entries.len());
    }

    #[test]
    fn polar_consonants_come_in_pairs() {
        let entries = builtin_alphabet();
        let back = entries.iter().filter(|e| e.polarity == Polarity::Back).count();
        let front = entries.iter().filter(|e| e.polarity == Polarity::Front).count();
        assert_eq!(back, 10);
        assert_eq!(front, 10);
    }
}
