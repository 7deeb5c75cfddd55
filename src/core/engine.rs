use crate::config::DrillConfig;
use crate::core::curriculum::Curriculum;
use crate::core::distractor::{latin_options, script_options};
use crate::core::events::{DrillEvent, SoundCue};
use crate::core::timeline::{ScheduledAction, Timeline};
use crate::core::types::{fold_latin, Direction, Glyph, SettingName, Settings, Token, WordEntry};
use crate::error::DrillError;
use crate::learning::MasteryTracker;
use crate::persistence::{
    decode_progress_code, encode_progress_code, load_progress, save_progress, FileStore,
    PersistedProgress, ProgressCode, ProgressStore,
};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Where the learner is in the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillSession {
    pub current_level: u32,
    pub current_word_index: usize,
    pub current_letter_index: usize,
    pub direction: Direction,
    pub learned_chars: BTreeSet<Glyph>,
}

impl Default for DrillSession {
    fn default() -> Self {
        Self {
            current_level: 1,
            current_word_index: 0,
            current_letter_index: 0,
            direction: Direction::ScriptToLatin,
            learned_chars: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingLevel,
    AwaitingLetter,
    WordComplete,
    LevelComplete,
    CourseComplete,
}

/// Observable state of the drill. Entering a level or a word is immediate,
/// so the machine rests only in these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    AwaitingLevel { level: u32 },
    AwaitingLetter {
        level: u32,
        word_index: usize,
        letter_index: usize,
        direction: Direction,
    },
    WordComplete { level: u32, word_index: usize },
    LevelComplete { level: u32 },
    CourseComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct { glyph: Glyph, word_complete: bool },
    Wrong { expected: Glyph },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` for answer cells the learner has not filled yet.
    pub text: Option<char>,
    pub mark: CellMark,
}

/// The two rows of the current word as the learner sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordView {
    pub meaning: String,
    pub direction: Direction,
    pub question: Vec<Cell>,
    pub answer: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarItem {
    pub glyph: Glyph,
    pub latin: String,
    pub learned: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetBar {
    pub visible: bool,
    pub items: Vec<BarItem>,
}

pub struct DrillEngine {
    curriculum: Curriculum,
    config: DrillConfig,
    session: DrillSession,
    phase: Phase,
    mastery: MasteryTracker,
    settings: Settings,
    options: Vec<Token>,
    timeline: Timeline,
    events: Vec<DrillEvent>,
    rng: ChaCha8Rng,
    store: Option<Box<dyn ProgressStore>>,
}

impl DrillEngine {
    /// A fresh engine with nothing persisted.
    pub fn new(curriculum: Curriculum, config: DrillConfig) -> Self {
        let mut mastery = MasteryTracker::new();
        mastery.initialize(curriculum.all_entries().iter().map(|e| e.glyph));
        Self {
            curriculum,
            config,
            session: DrillSession::default(),
            phase: Phase::AwaitingLevel,
            mastery,
            settings: Settings::default(),
            options: Vec::new(),
            timeline: Timeline::new(),
            events: Vec::new(),
            rng: ChaCha8Rng::from_entropy(),
            store: None,
        }
    }

    /// Restores progress from `store`. An unreadable record is discarded and
    /// the learner starts over.
    pub fn with_store(
        curriculum: Curriculum,
        config: DrillConfig,
        store: Box<dyn ProgressStore>,
    ) -> Self {
        let mut engine = Self::new(curriculum, config);
        match load_progress(store.as_ref(), &engine.config.storage_key) {
            Ok(Some(progress)) => engine.restore(progress),
            Ok(None) => debug!("no saved progress, starting fresh"),
            Err(e) => warn!(error = %e, "discarding unreadable progress"),
        }
        engine.store = Some(store);
        engine
    }

    /// The built-in course backed by a file store in the configured data directory.
    pub fn open(config: DrillConfig) -> Self {
        let store = FileStore::new(config.resolved_data_dir());
        Self::with_store(Curriculum::builtin(), config, Box::new(store))
    }

    /// Replaces the random source used for option shuffling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    fn restore(&mut self, progress: PersistedProgress) {
        self.session = DrillSession {
            current_level: progress.level.max(1),
            current_word_index: progress.word_index,
            current_letter_index: progress.letter_index,
            direction: Direction::for_word_index(progress.word_index),
            learned_chars: progress.learned_chars,
        };
        self.mastery = MasteryTracker::from_records(progress.stats);
        self.mastery
            .initialize(self.curriculum.all_entries().iter().map(|e| e.glyph));
        self.settings = progress.settings;
        self.phase = Phase::AwaitingLevel;
        debug!(
            level = self.session.current_level,
            word = self.session.current_word_index,
            letter = self.session.current_letter_index,
            "restored saved progress"
        );
    }

    // =========================================
    // Flow
    // =========================================

    /// Begins or resumes the drill at the stored cursor. A finished level
    /// resumes at its level-up; a cursor past the end restarts the level.
    pub fn start(&mut self) {
        self.emit_sound(SoundCue::Start);
        let level = self.session.current_level;
        if self.curriculum.level_info(level).is_none() {
            self.enter_course_complete();
            self.persist();
            return;
        }

        let word_index = self.session.current_word_index;
        let letter_index = self.session.current_letter_index;
        let word_count = self.curriculum.words_for_level(level).len();
        let word_len = self.curriculum.word(level, word_index).map(WordEntry::len);

        self.timeline.clear();
        self.enter_level(level, false);
        match word_len {
            None if word_index == word_count => {
                // Stopped between the last word and the level-up.
                self.session.current_word_index = word_index;
                self.enter_level_complete();
            }
            Some(len) if letter_index < len => {
                self.session.current_word_index = word_index;
                self.begin_word_at(letter_index);
            }
            Some(_) => {
                // The stored word was already finished.
                self.session.current_word_index = word_index + 1;
                self.begin_word_at(0);
            }
            None => self.begin_word_at(0),
        }
        self.persist();
    }

    /// Enters level `n` at its first word, or finishes the course when `n`
    /// does not exist.
    pub fn start_level(&mut self, level: u32) {
        self.timeline.clear();
        self.start_level_inner(level, false);
        self.persist();
    }

    fn start_level_inner(&mut self, level: u32, is_level_up: bool) {
        if self.curriculum.level_info(level).is_none() {
            self.session.current_level = level;
            self.enter_course_complete();
            return;
        }
        self.enter_level(level, is_level_up);
        self.begin_word_at(0);
    }

    /// Marks the level's letters introduced and learned and rewinds to word 0.
    fn enter_level(&mut self, level: u32, is_level_up: bool) {
        let new_chars = self
            .curriculum
            .level_info(level)
            .map(|l| l.new_chars.clone())
            .unwrap_or_default();
        self.mastery.mark_introduced(&new_chars);
        self.session.learned_chars.extend(new_chars.iter().copied());
        self.session.current_level = level;
        self.session.current_word_index = 0;
        self.session.current_letter_index = 0;
        info!(level, is_level_up, "level started");
        self.events.push(DrillEvent::LevelStarted { level, is_level_up });
    }

    /// Restarts the current word from its first letter.
    pub fn start_word(&mut self) -> Result<(), DrillError> {
        match self.phase {
            Phase::AwaitingLetter | Phase::WordComplete => {
                self.timeline.clear();
                self.begin_word_at(0);
                self.persist();
                Ok(())
            }
            _ => Err(self.invalid_state("start a word")),
        }
    }

    /// Builds the options for the word at the cursor and awaits `letter_index`.
    fn begin_word_at(&mut self, letter_index: usize) {
        let level = self.session.current_level;
        let word_index = self.session.current_word_index;
        let Some(word) = self.curriculum.word(level, word_index).cloned() else {
            self.enter_level_complete();
            return;
        };

        let direction = Direction::for_word_index(word_index);
        let available = self.curriculum.chars_introduced_through(level);
        let size = self.config.option_count;
        self.options = match direction {
            Direction::ScriptToLatin => {
                latin_options(&self.curriculum, &word, &available, size, &mut self.rng)
            }
            Direction::LatinToScript => script_options(&word, &available, size, &mut self.rng),
        };
        self.session.direction = direction;
        self.session.current_letter_index = letter_index;
        self.phase = Phase::AwaitingLetter;
        debug!(level, word_index, ?direction, word = %word.latin_text(), "word started");
        self.events.push(DrillEvent::WordStarted { direction });
        self.emit_hint();
    }

    /// Checks `candidate` against the letter at the cursor.
    ///
    /// Rejected with `InvalidState` unless a letter is awaited; a rejected
    /// call changes nothing.
    pub fn submit_answer(&mut self, candidate: Token) -> Result<AnswerOutcome, DrillError> {
        if self.phase != Phase::AwaitingLetter {
            return Err(self.invalid_state("answer"));
        }
        let idx = self.session.current_letter_index;
        let (expected, expected_latin, word_len) = {
            let word = self
                .current_word()
                .ok_or_else(|| DrillError::InvalidState("no current word".to_string()))?;
            match (word.script.get(idx), word.latin.get(idx)) {
                (Some(&glyph), Some(&latin)) => (glyph, latin, word.len()),
                _ => {
                    return Err(DrillError::InvalidState(format!(
                        "letter {} is outside word '{}'",
                        idx,
                        word.latin_text()
                    )))
                }
            }
        };

        let matches = match (self.session.direction, candidate) {
            (Direction::ScriptToLatin, Token::Latin(c)) => fold_latin(c) == fold_latin(expected_latin),
            (Direction::LatinToScript, Token::Script(g)) => g == expected,
            _ => false,
        };

        let outcome = if matches {
            self.mastery.record_outcome(expected, true);
            self.session.current_letter_index += 1;
            self.emit_sound(SoundCue::Correct);
            self.events.push(DrillEvent::CorrectAnswer { glyph: expected });

            let word_complete = self.session.current_letter_index == word_len;
            if word_complete {
                self.enter_word_complete();
            } else {
                self.emit_hint();
            }
            AnswerOutcome::Correct { glyph: expected, word_complete }
        } else {
            self.mastery.record_outcome(expected, false);
            self.emit_sound(SoundCue::Wrong);
            self.events.push(DrillEvent::WrongAnswer { glyph: expected });
            AnswerOutcome::Wrong { expected }
        };
        self.persist();
        Ok(outcome)
    }

    fn enter_word_complete(&mut self) {
        self.phase = Phase::WordComplete;
        self.emit_sound(SoundCue::WordComplete);
        self.events.push(DrillEvent::WordComplete);
        self.timeline.schedule(
            self.config.timing.word_advance_ms,
            ScheduledAction::AdvanceWord {
                level: self.session.current_level,
                word_index: self.session.current_word_index,
            },
        );
    }

    /// Moves past a completed word without waiting for the scheduled delay.
    pub fn advance_word(&mut self) -> Result<(), DrillError> {
        if self.phase != Phase::WordComplete {
            return Err(self.invalid_state("advance the word"));
        }
        self.timeline.clear();
        self.advance_word_inner();
        self.persist();
        Ok(())
    }

    fn advance_word_inner(&mut self) {
        self.session.current_word_index += 1;
        self.begin_word_at(0);
    }

    fn enter_level_complete(&mut self) {
        let level = self.session.current_level;
        let bonus_sentence = self
            .curriculum
            .level_info(level)
            .and_then(|l| l.bonus_sentence.clone());
        let delay = self
            .config
            .timing
            .level_advance_delay(bonus_sentence.is_some());

        self.phase = Phase::LevelComplete;
        self.session.current_letter_index = 0;
        self.options.clear();
        info!(level, "level complete");
        self.emit_sound(SoundCue::LevelComplete);
        self.events.push(DrillEvent::LevelComplete { bonus_sentence });
        self.timeline
            .schedule(delay, ScheduledAction::AdvanceLevel { level });
    }

    /// Moves on from a completed level without waiting for the scheduled delay.
    pub fn advance_level(&mut self) -> Result<(), DrillError> {
        if self.phase != Phase::LevelComplete {
            return Err(self.invalid_state("advance the level"));
        }
        self.timeline.clear();
        self.advance_level_inner();
        self.persist();
        Ok(())
    }

    fn advance_level_inner(&mut self) {
        let next = self.session.current_level + 1;
        self.start_level_inner(next, true);
    }

    fn enter_course_complete(&mut self) {
        self.phase = Phase::CourseComplete;
        self.options.clear();
        info!("course complete");
        self.events.push(DrillEvent::CourseComplete);
    }

    // =========================================
    // Scheduled work
    // =========================================

    /// Advances the logical clock by `elapsed_ms` and runs everything that
    /// became due, including work scheduled by what just ran.
    pub fn tick(&mut self, elapsed_ms: u64) {
        let target = self.timeline.now_ms().saturating_add(elapsed_ms);
        let mut fired = false;
        while let Some(action) = self.timeline.pop_due(target) {
            fired |= self.fire(action);
        }
        self.timeline.advance_to(target);
        if fired {
            self.persist();
        }
    }

    /// Runs every pending action regardless of its delay.
    pub fn run_pending(&mut self) {
        let mut fired = false;
        while let Some(action) = self.timeline.pop_due(u64::MAX) {
            fired |= self.fire(action);
        }
        if fired {
            self.persist();
        }
    }

    pub fn next_due_in(&self) -> Option<u64> {
        self.timeline.next_due_in()
    }

    fn fire(&mut self, action: ScheduledAction) -> bool {
        match action {
            ScheduledAction::AdvanceWord { level, word_index }
                if self.phase == Phase::WordComplete
                    && self.session.current_level == level
                    && self.session.current_word_index == word_index =>
            {
                self.advance_word_inner();
                true
            }
            ScheduledAction::AdvanceLevel { level }
                if self.phase == Phase::LevelComplete && self.session.current_level == level =>
            {
                self.advance_level_inner();
                true
            }
            stale => {
                debug!(?stale, "skipping stale scheduled action");
                false
            }
        }
    }

    // =========================================
    // Settings and progress
    // =========================================

    pub fn set_setting(&mut self, name: SettingName, value: bool) {
        self.settings.set(name, value);
        self.events.push(DrillEvent::SettingChanged { name, value });
        match name {
            SettingName::SoundEnabled => {}
            SettingName::HintsEnabled if value => self.emit_hint(),
            SettingName::HintsEnabled => self.events.push(DrillEvent::HintHidden),
            SettingName::AlphabetBarEnabled => {
                self.events.push(DrillEvent::AlphabetBarVisibility(value))
            }
        }
        self.persist();
    }

    pub fn set_setting_by_name(&mut self, name: &str, value: bool) -> Result<(), DrillError> {
        let name: SettingName = name.parse()?;
        self.set_setting(name, value);
        Ok(())
    }

    /// Forgets everything except settings, which are written back at once.
    /// The drill waits at level 1 until `start` is called again.
    pub fn reset_progress(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.remove(&self.config.storage_key) {
                warn!(error = %e, "could not remove saved progress");
            }
        }
        self.session = DrillSession::default();
        self.mastery.reset_all();
        self.mastery
            .initialize(self.curriculum.all_entries().iter().map(|e| e.glyph));
        self.timeline.clear();
        self.options.clear();
        self.phase = Phase::AwaitingLevel;
        info!("progress reset");
        self.events.push(DrillEvent::ProgressReset);
        self.persist();
    }

    pub fn export_progress_code(&self) -> Result<String, DrillError> {
        let code = ProgressCode {
            level: self.session.current_level,
            learned_chars: self.session.learned_chars.iter().copied().collect(),
            stats: self.mastery.records().clone(),
        };
        Ok(encode_progress_code(&code)?)
    }

    /// Replaces level, learned letters and statistics with those in `code`
    /// and restarts that level. A bad code leaves the session untouched.
    pub fn import_progress_code(&mut self, code: &str) -> Result<(), DrillError> {
        let code = decode_progress_code(code)?;
        self.session = DrillSession {
            learned_chars: code.learned_chars.into_iter().collect(),
            ..DrillSession::default()
        };
        self.mastery = MasteryTracker::from_records(code.stats);
        self.mastery
            .initialize(self.curriculum.all_entries().iter().map(|e| e.glyph));
        self.timeline.clear();
        self.start_level_inner(code.level.max(1), false);
        self.persist();
        Ok(())
    }

    pub fn snapshot(&self) -> PersistedProgress {
        PersistedProgress {
            level: self.session.current_level,
            word_index: self.session.current_word_index,
            letter_index: self.session.current_letter_index,
            learned_chars: self.session.learned_chars.clone(),
            stats: self.mastery.records().clone(),
            settings: self.settings,
            saved_at: Some(Utc::now()),
        }
    }

    /// Writes the session to the store, if there is one.
    pub fn save_progress(&mut self) -> Result<(), DrillError> {
        let progress = self.snapshot();
        if let Some(store) = self.store.as_mut() {
            save_progress(store.as_mut(), &self.config.storage_key, &progress)?;
        }
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save_progress() {
            warn!(error = %e, "could not save progress");
        }
    }

    // =========================================
    // Queries
    // =========================================

    pub fn state(&self) -> DrillState {
        let s = &self.session;
        match self.phase {
            Phase::AwaitingLevel => DrillState::AwaitingLevel { level: s.current_level },
            Phase::AwaitingLetter => DrillState::AwaitingLetter {
                level: s.current_level,
                word_index: s.current_word_index,
                letter_index: s.current_letter_index,
                direction: s.direction,
            },
            Phase::WordComplete => DrillState::WordComplete {
                level: s.current_level,
                word_index: s.current_word_index,
            },
            Phase::LevelComplete => DrillState::LevelComplete { level: s.current_level },
            Phase::CourseComplete => DrillState::CourseComplete,
        }
    }

    pub fn session(&self) -> &DrillSession {
        &self.session
    }

    pub fn mastery(&self) -> &MasteryTracker {
        &self.mastery
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&dyn ProgressStore> {
        self.store.as_deref()
    }

    pub fn current_word(&self) -> Option<&WordEntry> {
        self.curriculum
            .word(self.session.current_level, self.session.current_word_index)
    }

    /// The answer buttons for the current word.
    pub fn current_options(&self) -> &[Token] {
        &self.options
    }

    /// Takes the events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<DrillEvent> {
        std::mem::take(&mut self.events)
    }

    /// Maps a typed key to an answer. Latin keys must match a visible option;
    /// in script mode the first introduced letter whose Latin label starts
    /// with the key is chosen.
    pub fn resolve_key(&self, key: char) -> Option<Token> {
        if self.phase != Phase::AwaitingLetter {
            return None;
        }
        match self.session.direction {
            Direction::ScriptToLatin => {
                let token = Token::Latin(fold_latin(key));
                self.options.contains(&token).then_some(token)
            }
            Direction::LatinToScript => {
                let key: String = key.to_uppercase().collect();
                self.curriculum
                    .chars_introduced_through(self.session.current_level)
                    .into_iter()
                    .find(|&glyph| {
                        self.curriculum
                            .entry_by_char(glyph)
                            .map(|e| e.latin_label().to_uppercase().starts_with(&key))
                            .unwrap_or(false)
                    })
                    .map(Token::Script)
            }
        }
    }

    /// Hint for the awaited letter, when hints are on.
    pub fn hint(&self) -> Option<(Glyph, &str)> {
        if !self.settings.hints_enabled || self.phase != Phase::AwaitingLetter {
            return None;
        }
        let glyph = *self
            .current_word()?
            .script
            .get(self.session.current_letter_index)?;
        let entry = self.curriculum.entry_by_char(glyph)?;
        Some((glyph, entry.hint.as_str()))
    }

    pub fn word_view(&self) -> Option<WordView> {
        if !matches!(self.phase, Phase::AwaitingLetter | Phase::WordComplete) {
            return None;
        }
        let word = self.current_word()?;
        let cursor = self.session.current_letter_index;
        let direction = self.session.direction;
        let mark = |i: usize| match i.cmp(&cursor) {
            std::cmp::Ordering::Less => CellMark::Completed,
            std::cmp::Ordering::Equal => CellMark::Active,
            std::cmp::Ordering::Greater => CellMark::Pending,
        };
        let (shown, answered) = match direction {
            Direction::ScriptToLatin => (&word.script, &word.latin),
            Direction::LatinToScript => (&word.latin, &word.script),
        };

        let question = (0..word.len())
            .map(|i| Cell { text: Some(shown[i]), mark: mark(i) })
            .collect();
        let answer = (0..word.len())
            .map(|i| Cell {
                text: (i < cursor).then(|| answered[i]),
                mark: mark(i),
            })
            .collect();

        Some(WordView {
            meaning: word.meaning.clone(),
            direction,
            question,
            answer,
        })
    }

    pub fn alphabet_bar(&self) -> AlphabetBar {
        let current: &[Glyph] = self
            .curriculum
            .level_info(self.session.current_level)
            .map(|l| l.new_chars.as_slice())
            .unwrap_or(&[]);
        let items = self
            .curriculum
            .basic_alphabet()
            .map(|entry| BarItem {
                glyph: entry.glyph,
                latin: entry.latin_label(),
                learned: self.session.learned_chars.contains(&entry.glyph),
                current: current.contains(&entry.glyph),
            })
            .collect();
        AlphabetBar {
            visible: self.settings.alphabet_bar_enabled,
            items,
        }
    }

    /// `(completed words, words in level)` for the current level.
    pub fn level_progress(&self) -> (usize, usize) {
        let total = self.curriculum.words_for_level(self.session.current_level).len();
        (self.session.current_word_index.min(total), total)
    }

    // =========================================
    // Helpers
    // =========================================

    fn emit_sound(&mut self, cue: SoundCue) {
        if self.settings.sound_enabled {
            self.events.push(DrillEvent::Sound(cue));
        }
    }

    fn emit_hint(&mut self) {
        let hint = self.hint().map(|(glyph, text)| DrillEvent::Hint {
            glyph,
            text: text.to_string(),
        });
        if let Some(event) = hint {
            self.events.push(event);
        }
    }

    fn invalid_state(&self, action: &str) -> DrillError {
        DrillError::InvalidState(format!("cannot {} in state {:?}", action, self.state()))
    }
}
