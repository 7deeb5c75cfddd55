// src/core/levels.rs
//! The built-in course: eleven levels of real words written in the script.
use crate::core::types::{BonusSentence, Glyph, LevelDefinition, WordEntry};

type WordRow = (&'static str, &'static str, &'static str, Option<(&'static str, &'static str)>);

pub(crate) struct LevelRow {
    number: u32,
    name: &'static str,
    description: &'static str,
    new_chars: &'static [Glyph],
    grammar_note: Option<&'static str>,
    bonus: Option<(&'static str, &'static str, &'static str)>,
    words: &'static [WordRow],
}

pub(crate) static LEVELS: &[LevelRow] = &[
    LevelRow {
        number: 1,
        name: "Başlangıç",
        description: "Temel sesler: A, I, T",
        new_chars: &['\u{10C00}', '\u{10C03}', '\u{10C43}', '\u{10C45}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐰀𐱃", "AT", "At (hayvan)", None),
            ("𐰀𐱃𐰀", "ATA", "Ata, dede, cet", None),
            ("𐰃𐱅", "İT", "Köpek", None),
        ],
    },
    LevelRow {
        number: 2,
        name: "İlerleyiş",
        description: "Yeni sesler: R, K",
        new_chars: &['\u{10C3A}', '\u{10C34}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐰴𐰀𐱃", "KAT", "Kat, tabaka", None),
            ("𐰀𐰴", "AK", "Beyaz, temiz", None),
            ("𐰀𐰺𐱃", "ART", "Arka, arkası", None),
        ],
    },
    LevelRow {
        number: 3,
        name: "Genişleme",
        description: "Yeni sesler: O/U, L",
        new_chars: &['\u{10C06}', '\u{10C1E}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐰆𐰞", "OL", "Ol, var ol", None),
            ("𐰆𐱃", "OT", "Ot, çimen", None),
            ("𐰴𐰆𐰞", "KOL", "Kol, uzuv", None),
            ("𐰀𐰞𐱃", "ALT", "Aşağı, alt taraf", None),
        ],
    },
    LevelRow {
        number: 4,
        name: "Büyüme",
        description: "Yeni sesler: N, S, Ş",
        new_chars: &['\u{10C23}', '\u{10C3D}', '\u{10C41}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐰽𐰆𐰣", "SON", "Son, bitiş", None),
            ("𐱃𐰀𐰣", "TAN", "Şafak, tan vakti", None),
            ("𐰀𐰽", "AS", "Asmak, asıl", None),
            ("𐱃𐰀𐱁", "TAŞ", "Kaya, taş", None),
        ],
    },
    LevelRow {
        number: 5,
        name: "Derinleşme",
        description: "Yeni sesler: Ö/Ü, B",
        new_chars: &['\u{10C07}', '\u{10C09}', '\u{10C0B}', '\u{10C20}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐰉𐰀𐱁", "BAŞ", "Baş, kafa", None),
            ("𐰉𐰀𐱃", "BAT", "Batmak, gün batımı", None),
            ("𐰇𐰠", "ÖL", "Ölmek", None),
            ("𐰉𐰆", "BO", "Bu, işaret (eski Türkçe)", None),
        ],
    },
    LevelRow {
        number: 6,
        name: "Gelişim",
        description: "Yeni sesler: G, M",
        new_chars: &['\u{10C0D}', '\u{10C22}', '\u{10C1A}'],
        grammar_note: None,
        bonus: None,
        words: &[
            ("𐱃𐰀𐰢", "TAM", "Tam, eksiksiz", None),
            ("𐰍𐰇𐰚", "GÖK", "Gökyüzü", None),
            ("𐰽𐰆𐰢", "SOM", "Som, katı altın", None),
        ],
    },
    LevelRow {
        number: 7,
        name: "Tarih",
        description: "Tarihi Türk kelimeleri",
        new_chars: &['\u{10C3C}', '\u{10C2D}', '\u{10C1C}'],
        grammar_note: None,
        bonus: Some(("𐱅𐰇𐰼𐰜 𐰉𐰆𐰑𐰣", "TÜRK BODUN", "Türk Milleti")),
        words: &[
            ("𐱅𐰇𐰼𐰜", "TÜRK", "Türk milleti - Orhun Yazıtları'ndan", None),
            ("𐱅𐰭𐰼𐰃", "TENGRİ", "Tengri, Tanrı", None),
            ("𐰴𐰀𐰍𐰀𐰣", "KAĞAN", "Kağan, hükümdar", None),
            ("𐰋𐰃𐰠𐰍𐰀", "BİLGE", "Bilge, bilgin", None),
        ],
    },
    LevelRow {
        number: 8,
        name: "İyelik",
        description: "'+m' iyelik eki: benim anlamı katar",
        new_chars: &['\u{10C11}', '\u{10C16}'],
        grammar_note: Some("+m eki, kelimenin 1. şahsa ait olduğunu gösterir: AT → ATIM (benim atım)"),
        bonus: None,
        words: &[
            ("𐰀𐱃𐰃𐰢", "ATIM", "Atım (benim atım)", Some(("AT", "+IM"))),
            ("𐰴𐰀𐰍𐰀𐰣𐰃𐰢", "KAĞANIM", "Kağanım (benim kağanım)", Some(("KAĞAN", "+IM"))),
            ("𐰉𐰆𐰑𐰣𐰃𐰢", "BODUNUM", "Milletim (benim milletim)", Some(("BODUN", "+UM"))),
            ("𐰋𐰃𐰠𐰍𐰀𐰢", "BİLGEM", "Bilgem (benim bilgim)", Some(("BİLGE", "+M"))),
        ],
    },
    LevelRow {
        number: 9,
        name: "Sahiplik",
        description: "'+lXg' sahiplik eki: -lı/-li anlamı katar",
        new_chars: &[],
        grammar_note: Some("+lXg eki, bir şeye sahip olma anlamı katar: AT → ATLIG (atlı, at sahibi)"),
        bonus: Some(("𐰋𐰃𐰠𐰍𐰀 𐰴𐰀𐰍𐰀𐰣", "BİLGE KAĞAN", "Bilge Kağan")),
        words: &[
            ("𐰀𐱃𐰞𐰃𐰍", "ATLIG", "Atlı, süvari", Some(("AT", "+LIG"))),
            ("𐰉𐰀𐱁𐰞𐰃𐰍", "BAŞLIG", "Başlı, lideri olan", Some(("BAŞ", "+LIG"))),
            ("𐰴𐰆𐱃𐰞𐰆𐰍", "KUTLUG", "Kutlu, mübarek", Some(("KUT", "+LUG"))),
            ("𐱃𐰆𐰣𐰞𐰆𐰍", "TONLUG", "Elbiseli, giyimli", Some(("TON", "+LUG"))),
        ],
    },
    LevelRow {
        number: 10,
        name: "Yokluk",
        description: "'+sXz' yokluk eki: -sız/-siz anlamı katar",
        new_chars: &[],
        grammar_note: Some("+sXz eki, bir şeye sahip olmama anlamı katar: YOL → YOLSUZ (yolsuz)"),
        bonus: None,
        words: &[
            ("𐰖𐰆𐰞𐰽𐰆𐰔", "YOLSUZ", "Yolsuz, yolu olmayan", Some(("YOL", "+SUZ"))),
            ("𐱃𐰆𐰣𐰽𐰆𐰔", "TONSUZ", "Elbisesiz, çıplak", Some(("TON", "+SUZ"))),
            ("𐰋𐰃𐰠𐰍𐰀𐰾𐰃𐰔", "BİLGESİZ", "Bilgesiz, cahil", Some(("BİLGE", "+SİZ"))),
            ("𐰴𐰀𐰍𐰀𐰣𐰽𐰃𐰔", "KAĞANSIZ", "Kağansız, hükümdarsız", Some(("KAĞAN", "+SIZ"))),
        ],
    },
    LevelRow {
        number: 11,
        name: "Meslek",
        description: "'+çI' meslek eki: -cı/-ci anlamı katar",
        new_chars: &[],
        grammar_note: Some("+çI eki, o işle uğraşan kişi anlamı katar: YAGI → YAGIÇI (savaşçı)"),
        bonus: Some(("𐱅𐰭𐰼𐰃 𐱅𐰩 𐱅𐰇𐰼𐰜 𐰋𐰃𐰠𐰍𐰀 𐰴𐰀𐰍𐰀𐰣", "TENGRİ TEG TÜRK BİLGE KAĞAN", "Tanrı gibi Türk Bilge Kağan")),
        words: &[
            ("𐰖𐰀𐰍𐰃𐰲𐰃", "YAGIÇI", "Savaşçı, düşmanla savaşan", Some(("YAGI", "+ÇI"))),
            ("𐰖𐰃𐰺𐰲𐰃", "YIRÇI", "Kılavuz, yol gösteren", Some(("YIR", "+ÇI"))),
            ("𐰉𐰃𐱃𐰃𐰍𐰲𐰃", "BİTİGÇİ", "Yazıcı, katip", Some(("BİTİG", "+Çİ"))),
            ("𐰀𐰞𐰯𐰲𐰃", "ALPÇI", "Alp, kahraman savaşçı", Some(("ALP", "+ÇI"))),
        ],
    },
];

fn word_from_row(&(script, latin, meaning, morphology): &WordRow) -> WordEntry {
    WordEntry {
        script: script.chars().collect(),
        latin: latin.chars().collect(),
        meaning: meaning.to_string(),
        root: morphology.map(|(root, _)| root.to_string()),
        suffix: morphology.map(|(_, suffix)| suffix.to_string()),
    }
}

impl LevelRow {
    pub(crate) fn to_definition(&self) -> LevelDefinition {
        LevelDefinition {
            number: self.number,
            name: self.name.to_string(),
            description: self.description.to_string(),
            new_chars: self.new_chars.to_vec(),
            words: self.words.iter().map(word_from_row).collect(),
            bonus_sentence: self.bonus.map(|(script, latin, meaning)| BonusSentence {
                script: script.to_string(),
                latin: latin.to_string(),
                meaning: meaning.to_string(),
            }),
            grammar_note: self.grammar_note.map(str::to_string),
        }
    }
}

pub fn builtin_levels() -> Vec<LevelDefinition> {
    LEVELS.iter().map(LevelRow::to_definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_level_matches_course_opening() {
        let levels = builtin_levels();
        let first = &levels[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.words[0].latin_text(), "AT");
        assert_eq!(first.words[0].script, vec!['\u{10C00}', '\u{10C43}']);
        assert_eq!(first.words[2].latin, vec!['İ', 'T']);
    }

    #[test]
    fn bonus_sentences_sit_on_history_and_suffix_levels() {
        let with_bonus: Vec<u32> = builtin_levels()
            .iter()
            .filter(|l| l.bonus_sentence.is_some())
            .map(|l| l.number)
            .collect();
        assert_eq!(with_bonus, vec![7, 9, 11]);
    }

    #[test]
    fn suffix_words_carry_their_root() {
        let levels = builtin_levels();
        let atim = &levels[7].words[0];
        assert_eq!(atim.root.as_deref(), Some("AT"));
        assert_eq!(atim.suffix.as_deref(), Some("+IM"));
        assert!(levels[0].words[0].root.is_none());
    }
}
