// File: src/learning.rs
use crate::core::curriculum::Curriculum;
use crate::core::types::Glyph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accuracy (percent) at or above which an introduced letter counts as mastered.
pub const MASTERY_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryRecord {
    #[serde(rename = "correct")]
    pub correct_count: u32,
    #[serde(rename = "wrong")]
    pub wrong_count: u32,
    pub introduced: bool,
}

impl MasteryRecord {
    pub fn attempts(&self) -> u32 {
        self.correct_count + self.wrong_count
    }

    /// Rounded percentage of correct answers, 0 before the first attempt.
    pub fn accuracy(&self) -> u32 {
        let total = self.attempts();
        if total == 0 {
            return 0;
        }
        ((self.correct_count as f64 / total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryStatus {
    NotIntroduced,
    Learning,
    Mastered,
}

/// One row of the statistics view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasteryReportRow {
    pub glyph: Glyph,
    pub latin: String,
    pub accuracy: u32,
    pub status: MasteryStatus,
}

/// Per-letter answer counters. Records are keyed by glyph and kept ordered
/// so persisted output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasteryTracker {
    records: BTreeMap<Glyph, MasteryRecord>,
}

impl MasteryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: BTreeMap<Glyph, MasteryRecord>) -> Self {
        Self { records }
    }

    /// Ensures every glyph has a record. Existing records are left alone.
    pub fn initialize<I: IntoIterator<Item = Glyph>>(&mut self, glyphs: I) {
        for glyph in glyphs {
            self.records.entry(glyph).or_default();
        }
    }

    /// Counts one answer. Glyphs without a record are ignored.
    pub fn record_outcome(&mut self, glyph: Glyph, success: bool) {
        if let Some(record) = self.records.get_mut(&glyph) {
            if success {
                record.correct_count += 1;
            } else {
                record.wrong_count += 1;
            }
        }
    }

    pub fn mark_introduced<'a, I: IntoIterator<Item = &'a Glyph>>(&mut self, glyphs: I) {
        for glyph in glyphs {
            if let Some(record) = self.records.get_mut(glyph) {
                record.introduced = true;
            }
        }
    }

    pub fn record_of(&self, glyph: Glyph) -> Option<&MasteryRecord> {
        self.records.get(&glyph)
    }

    pub fn records(&self) -> &BTreeMap<Glyph, MasteryRecord> {
        &self.records
    }

    pub fn accuracy_of(&self, glyph: Glyph) -> u32 {
        self.records.get(&glyph).map(MasteryRecord::accuracy).unwrap_or(0)
    }

    pub fn status_of(&self, glyph: Glyph) -> MasteryStatus {
        match self.records.get(&glyph) {
            Some(r) if !r.introduced => MasteryStatus::NotIntroduced,
            Some(r) if r.attempts() > 0 && r.accuracy() >= MASTERY_THRESHOLD => {
                MasteryStatus::Mastered
            }
            Some(_) => MasteryStatus::Learning,
            None => MasteryStatus::NotIntroduced,
        }
    }

    /// Zeroes every record and marks it not introduced.
    pub fn reset_all(&mut self) {
        for record in self.records.values_mut() {
            *record = MasteryRecord::default();
        }
    }

    /// Statistics for the letters shown on the alphabet bar, in table order.
    pub fn report(&self, curriculum: &Curriculum) -> Vec<MasteryReportRow> {
        curriculum
            .basic_alphabet()
            .map(|entry| MasteryReportRow {
                glyph: entry.glyph,
                latin: entry.latin_label(),
                accuracy: self.accuracy_of(entry.glyph),
                status: self.status_of(entry.glyph),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Glyph = '\u{10C00}';
    const T: Glyph = '\u{10C43}';

    fn tracker() -> MasteryTracker {
        let mut t = MasteryTracker::new();
        t.initialize([A, T]);
        t
    }

    #[test]
    fn initialize_never_overwrites() {
        let mut t = tracker();
        t.record_outcome(A, true);
        t.initialize([A, T, '\u{10C03}']);
        assert_eq!(t.record_of(A).unwrap().correct_count, 1);
        assert_eq!(t.records().len(), 3);
    }

    #[test]
    fn unknown_glyph_is_ignored() {
        let mut t = tracker();
        t.record_outcome('x', true);
        assert!(t.record_of('x').is_none());
    }

    #[test]
    fn accuracy_is_zero_without_attempts() {
        let t = tracker();
        assert_eq!(t.accuracy_of(A), 0);
        assert_eq!(t.accuracy_of('x'), 0);
    }

    #[test]
    fn status_needs_introduction_and_eighty_percent() {
        let mut t = tracker();
        assert_eq!(t.status_of(A), MasteryStatus::NotIntroduced);

        t.mark_introduced(&[A]);
        assert_eq!(t.status_of(A), MasteryStatus::Learning);

        for _ in 0..4 {
            t.record_outcome(A, true);
        }
        t.record_outcome(A, false);
        assert_eq!(t.accuracy_of(A), 80);
        assert_eq!(t.status_of(A), MasteryStatus::Mastered);

        t.record_outcome(A, false);
        assert_eq!(t.status_of(A), MasteryStatus::Learning);
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = tracker();
        t.mark_introduced(&[A, T]);
        t.record_outcome(T, false);
        t.reset_all();
        assert_eq!(t.record_of(T), Some(&MasteryRecord::default()));
        assert_eq!(t.records().len(), 2);
    }

    #[test]
    fn report_covers_basic_alphabet() {
        let curriculum = Curriculum::builtin();
        let mut t = MasteryTracker::new();
        t.initialize(curriculum.all_entries().iter().map(|e| e.glyph));
        t.mark_introduced(&[A]);
        t.record_outcome(A, true);
        let report = t.report(&curriculum);
        assert_eq!(report.len(), 34);
        assert_eq!(report[0].latin, "A/E");
        assert_eq!(report[0].status, MasteryStatus::Mastered);
        assert_eq!(report[1].status, MasteryStatus::NotIntroduced);
    }
}
