use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, trace};

use crate::{
    clock::{Clock, SystemClock},
    error::{Error, Result},
    passage::{is_allowed, select_passage},
    score::{Outcome, ScoreResult},
};

/// A single key delivered to the session
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Keystroke {
    Char(char),
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

/// One typing trial: passage, typed buffer, clock and score
#[derive(Debug)]
pub struct TypingSession<C: Clock = SystemClock> {
    passage: String,
    passage_len: usize,
    typed: Vec<char>,
    started: bool,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    score: Option<ScoreResult>,
    rng: StdRng,
    clock: C,
}

impl TypingSession {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_clock(seed, SystemClock)
    }
}

impl<C: Clock> TypingSession<C> {
    /// Session over a random passage from the pool. A seed makes the
    /// sequence of passages across restarts reproducible.
    pub fn with_clock(seed: Option<u64>, clock: C) -> Self {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let (idx, passage) = select_passage(&mut rng);
        debug!(passage = idx, "selected passage");

        Self::build(passage.to_string(), rng, clock)
    }

    /// Session over an explicit passage. Restarts still draw from the pool.
    pub fn with_passage(passage: impl Into<String>, clock: C) -> Result<Self> {
        let passage = passage.into();
        if passage.is_empty() {
            return Err(Error::EmptyPassage);
        }

        Ok(Self::build(passage, StdRng::from_entropy(), clock))
    }

    fn build(passage: String, rng: StdRng, clock: C) -> Self {
        Self {
            passage_len: passage.chars().count(),
            passage,
            typed: Vec::new(),
            started: false,
            started_at: None,
            finished_at: None,
            score: None,
            rng,
            clock,
        }
    }

    pub fn passage(&self) -> &str {
        &self.passage
    }

    pub fn passage_len(&self) -> usize {
        self.passage_len
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn score(&self) -> Option<&ScoreResult> {
        self.score.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.score.is_some() {
            Phase::Finished
        } else if self.started {
            Phase::InProgress
        } else {
            Phase::NotStarted
        }
    }

    pub fn is_finished(&self) -> bool {
        self.score.is_some()
    }

    /// Passage characters paired with the outcome of the typed character at
    /// the same position, `None` past the typed length.
    pub fn marks(&self) -> impl Iterator<Item = (char, Option<Outcome>)> + '_ {
        self.passage.chars().enumerate().map(move |(idx, expected)| {
            let outcome = self.typed.get(idx).map(|&c| Outcome::of(c, expected));
            (expected, outcome)
        })
    }

    pub fn handle_character_input(&mut self, key: Keystroke) -> Phase {
        if self.is_finished() {
            return Phase::Finished;
        }

        self.mark_started();
        if self.apply(key) {
            self.check_completion();
        }

        let phase = self.phase();
        trace!(?key, %phase, typed = self.typed.len(), "keystroke");
        phase
    }

    /// The mirrored input field reports its whole value. Everything past the
    /// common prefix with the buffer is deleted, then the rest of `value` is
    /// fed through the keystroke rules one character at a time.
    pub fn handle_input_change(&mut self, value: &str) -> Phase {
        if self.is_finished() {
            return Phase::Finished;
        }

        self.mark_started();

        let common = self
            .typed
            .iter()
            .zip(value.chars())
            .take_while(|(a, b)| *a == b)
            .count();

        while self.typed.len() > common {
            self.apply(Keystroke::Delete);
        }

        for c in value.chars().skip(common) {
            if self.apply(Keystroke::Char(c)) && self.check_completion() {
                break;
            }
        }

        self.phase()
    }

    /// Fires once per session, when the buffer reaches the passage length.
    pub fn check_completion(&mut self) -> bool {
        if self.is_finished() || self.typed.len() != self.passage_len {
            return false;
        }

        let now = self.clock.now();
        let started_at = *self.started_at.get_or_insert(now);
        let score = ScoreResult::compute(
            &self.passage,
            &self.typed,
            now.saturating_duration_since(started_at),
        );

        info!(
            accuracy = score.accuracy(),
            wpm = score.wpm(),
            elapsed_secs = score.elapsed_secs(),
            "session finished"
        );

        self.finished_at = Some(now);
        self.score = Some(score);
        true
    }

    /// Start over with a fresh passage. Only honoured once finished.
    pub fn restart(&mut self) -> bool {
        if !self.is_finished() {
            return false;
        }

        self.started = false;
        self.started_at = None;
        self.finished_at = None;
        self.score = None;
        self.typed.clear();

        let (idx, passage) = select_passage(&mut self.rng);
        debug!(passage = idx, "selected passage");
        self.passage = passage.to_string();
        self.passage_len = self.passage.chars().count();

        info!("session restarted");
        true
    }

    fn mark_started(&mut self) {
        if !self.started {
            self.started = true;
            self.started_at = Some(self.clock.now());
            info!(passage_len = self.passage_len, "session started");
        }
    }

    /// Returns whether the buffer changed.
    fn apply(&mut self, key: Keystroke) -> bool {
        match key {
            Keystroke::Delete => self.typed.pop().is_some(),
            Keystroke::Char(c) if !is_allowed(c) => {
                trace!(?c, "rejected character");
                false
            }
            Keystroke::Char(c) => {
                if self.typed.len() < self.passage_len {
                    self.typed.push(c);
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::passage::PASSAGES;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn session(passage: &str) -> (TypingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = TypingSession::with_passage(passage, clock.clone()).unwrap();
        (session, clock)
    }

    fn type_str<C: Clock>(session: &mut TypingSession<C>, text: &str) -> Phase {
        let mut phase = session.phase();
        for c in text.chars() {
            phase = session.handle_character_input(Keystroke::Char(c));
        }
        phase
    }

    #[test]
    fn test_new_session_not_started() {
        let (session, _) = session("hello");

        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.typed().is_empty());
        assert_eq!(session.started_at(), None);
        assert_eq!(session.finished_at(), None);
        assert_eq!(session.score(), None);
        assert_eq!(session.passage_len(), 5);
    }

    #[test]
    fn test_random_session_uses_pool() {
        let session = TypingSession::new(Some(1));
        assert!(PASSAGES.contains(&session.passage()));
    }

    #[test]
    fn test_empty_passage_rejected() {
        assert_matches!(
            TypingSession::with_passage("", ManualClock::new()),
            Err(Error::EmptyPassage)
        );
    }

    #[test]
    fn test_first_keystroke_starts_clock() {
        let (mut session, clock) = session("hello");
        let t0 = clock.now();

        assert_eq!(session.handle_character_input(Keystroke::Char('h')), Phase::InProgress);
        assert_eq!(session.started_at(), Some(t0));

        clock.advance(Duration::from_secs(1));
        session.handle_character_input(Keystroke::Char('e'));
        assert_eq!(session.started_at(), Some(t0));
    }

    #[test]
    fn test_rejected_keystroke_still_starts_session() {
        let (mut session, _) = session("hello");

        assert_eq!(session.handle_character_input(Keystroke::Char('!')), Phase::InProgress);
        assert!(session.typed().is_empty());
        assert!(session.started_at().is_some());
    }

    #[test]
    fn test_disallowed_characters_leave_buffer_unchanged() {
        let (mut session, _) = session("hello world");
        type_str(&mut session, "he");

        for c in ['!', '?', '\t', '\n', 'é', '#'] {
            session.handle_character_input(Keystroke::Char(c));
            assert_eq!(session.typed_text(), "he");
        }
    }

    #[test]
    fn test_typed_case_preserved() {
        let (mut session, _) = session("hello");
        type_str(&mut session, "HeL");

        assert_eq!(session.typed_text(), "HeL");
        assert!(session
            .marks()
            .take(3)
            .all(|(_, outcome)| outcome == Some(Outcome::Correct)));
    }

    #[test]
    fn test_delete_removes_last_char() {
        let (mut session, _) = session("hello");
        type_str(&mut session, "hex");

        session.handle_character_input(Keystroke::Delete);
        assert_eq!(session.typed_text(), "he");
    }

    #[test]
    fn test_delete_on_empty_buffer() {
        let (mut session, _) = session("hello");

        assert_eq!(session.handle_character_input(Keystroke::Delete), Phase::InProgress);
        assert!(session.typed().is_empty());
    }

    #[test]
    fn test_buffer_length_tracks_accepted_keys() {
        let (mut session, _) = session("a long enough passage");
        let keys = [
            Keystroke::Delete,
            Keystroke::Char('a'),
            Keystroke::Char('!'),
            Keystroke::Char(' '),
            Keystroke::Delete,
            Keystroke::Delete,
            Keystroke::Delete,
            Keystroke::Char('L'),
            Keystroke::Char('o'),
        ];

        let mut expected: usize = 0;
        for key in keys {
            session.handle_character_input(key);
            expected = match key {
                Keystroke::Delete => expected.saturating_sub(1),
                Keystroke::Char(c) if is_allowed(c) => expected + 1,
                Keystroke::Char(_) => expected,
            };
            assert_eq!(session.typed().len(), expected);
        }
        assert_eq!(session.typed_text(), "Lo");
    }

    #[test]
    fn test_marks() {
        let (mut session, _) = session("abc");
        type_str(&mut session, "aX");

        let marks: Vec<_> = session.marks().collect();
        assert_eq!(
            marks,
            vec![
                ('a', Some(Outcome::Correct)),
                ('b', Some(Outcome::Incorrect)),
                ('c', None),
            ]
        );
    }

    #[test]
    fn test_completion_scores_hi_there() {
        let (mut session, clock) = session("hi there");

        session.handle_character_input(Keystroke::Char('h'));
        clock.advance(Duration::from_secs(10));
        assert_eq!(type_str(&mut session, "i ther3"), Phase::Finished);

        let score = session.score().copied().unwrap();
        assert_eq!(score.correct_chars, 7);
        assert_eq!(score.accuracy(), 87);
        assert_eq!(score.wpm(), 10);
        assert_eq!(score.elapsed_secs(), 10);
        assert_eq!(
            session.finished_at().unwrap() - session.started_at().unwrap(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_completion_fires_once() {
        let (mut session, clock) = session("hi");
        type_str(&mut session, "hi");

        let finished_at = session.finished_at();
        let score = session.score().copied();

        clock.advance(Duration::from_secs(5));
        assert!(!session.check_completion());
        assert_eq!(session.finished_at(), finished_at);
        assert_eq!(session.score().copied(), score);
    }

    #[test]
    fn test_input_ignored_after_finish() {
        let (mut session, clock) = session("hi");
        type_str(&mut session, "hi");
        let finished_at = session.finished_at();

        clock.advance(Duration::from_secs(1));
        assert_eq!(session.handle_character_input(Keystroke::Delete), Phase::Finished);
        assert_eq!(session.handle_character_input(Keystroke::Char('x')), Phase::Finished);
        assert_eq!(session.handle_input_change(""), Phase::Finished);

        assert_eq!(session.typed_text(), "hi");
        assert_eq!(session.finished_at(), finished_at);
    }

    #[test]
    fn test_same_instant_completion_is_finite() {
        let (mut session, _) = session("hi");
        type_str(&mut session, "hi");

        let score = session.score().unwrap();
        assert_eq!(score.elapsed, Duration::ZERO);
        assert!(score.wpm() < u64::MAX);
    }

    #[test]
    fn test_restart_refused_mid_session() {
        let (mut session, _) = session("hello");
        type_str(&mut session, "he");

        assert!(!session.restart());
        assert_eq!(session.typed_text(), "he");
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_restart_resets_everything() {
        let (mut session, _) = session("hi");
        type_str(&mut session, "hi");

        assert!(session.restart());
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.typed().is_empty());
        assert_eq!(session.started_at(), None);
        assert_eq!(session.finished_at(), None);
        assert_eq!(session.score(), None);
        assert!(PASSAGES.contains(&session.passage()));
        assert_eq!(session.passage_len(), session.passage().chars().count());
    }

    #[test]
    fn test_restart_then_exact_passage_is_perfect() {
        let (mut session, _) = session("hi");
        type_str(&mut session, "hx");
        assert_eq!(session.score().unwrap().accuracy(), 50);

        session.restart();
        let passage = session.passage().to_string();
        assert_eq!(type_str(&mut session, &passage), Phase::Finished);
        assert_eq!(session.score().unwrap().accuracy(), 100);
    }

    #[test]
    fn test_input_change_appends() {
        let (mut session, _) = session("hello");

        assert_eq!(session.handle_input_change("he"), Phase::InProgress);
        assert_eq!(session.typed_text(), "he");

        session.handle_input_change("hel");
        assert_eq!(session.typed_text(), "hel");
    }

    #[test]
    fn test_input_change_replaces_tail() {
        let (mut session, _) = session("hello");
        type_str(&mut session, "hxy");

        session.handle_input_change("hel");
        assert_eq!(session.typed_text(), "hel");
    }

    #[test]
    fn test_input_change_shrinks() {
        let (mut session, _) = session("hello");
        type_str(&mut session, "hell");

        session.handle_input_change("h");
        assert_eq!(session.typed_text(), "h");
    }

    #[test]
    fn test_input_change_drops_disallowed() {
        let (mut session, _) = session("hello world");

        session.handle_input_change("he!l?lo");
        assert_eq!(session.typed_text(), "hello");
    }

    #[test]
    fn test_input_change_stops_at_completion() {
        let (mut session, _) = session("hi");

        assert_eq!(session.handle_input_change("hi there"), Phase::Finished);
        assert_eq!(session.typed_text(), "hi");
        assert_eq!(session.score().unwrap().accuracy(), 100);
    }

    #[test]
    fn test_input_change_unchanged_value_starts_session() {
        let (mut session, _) = session("hello");

        assert_eq!(session.handle_input_change(""), Phase::InProgress);
        assert!(session.started_at().is_some());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::NotStarted.to_string(), "NotStarted");
        assert_eq!(Phase::Finished.to_string(), "Finished");
    }
}
