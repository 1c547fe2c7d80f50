use std::time::Duration;

/// One "word" is five characters.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed time never drops below this, keeping wpm finite.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn of(typed: char, expected: char) -> Self {
        if chars_match(typed, expected) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// Case-insensitive character comparison
pub fn chars_match(typed: char, expected: char) -> bool {
    typed == expected || typed.to_lowercase().eq(expected.to_lowercase())
}

/// Results of a finished session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreResult {
    pub correct_chars: usize,
    pub passage_len: usize,
    pub elapsed: Duration,
}

impl ScoreResult {
    pub fn compute(passage: &str, typed: &[char], elapsed: Duration) -> Self {
        let correct_chars = passage
            .chars()
            .zip(typed)
            .filter(|&(expected, &c)| chars_match(c, expected))
            .count();

        Self {
            correct_chars,
            passage_len: passage.chars().count(),
            elapsed,
        }
    }

    /// floor(100 * correct / length)
    pub fn accuracy(&self) -> usize {
        (100 * self.correct_chars)
            .checked_div(self.passage_len)
            .unwrap_or(0)
    }

    /// ceil((length / 5) / minutes)
    pub fn wpm(&self) -> u64 {
        let words = self.passage_len as f64 / CHARS_PER_WORD;
        let minutes = self.elapsed_millis() as f64 / 1000.0 / 60.0;

        (words / minutes).ceil() as u64
    }

    pub fn elapsed_secs(&self) -> u64 {
        (self.elapsed_millis() / 1000) as u64
    }

    fn elapsed_millis(&self) -> u128 {
        self.elapsed.max(MIN_ELAPSED).as_millis()
    }
}
