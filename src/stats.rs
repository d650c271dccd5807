use std::time::Duration;

use crate::word_stream::Word;

/// Something that happened to a word or a submission during a round
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// the player typed an active word
    Completed(Word),
    /// a word fell past the miss line
    Missed(Word),
    /// a submission matched no active word
    Mismatch,
}

/// Per-round statistics. Each event produces the next snapshot through
/// [`SessionStats::apply`]; nothing mutates it piecemeal.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    pub score: u64,
    pub total_words: u32,
    pub correct_words: u32,
    pub total_chars: u64,
    pub streak: u32,
    pub best_streak: u32,
    pub time_remaining: u32,
    pub accuracy: u32,
    pub wpm: u32,
}

impl SessionStats {
    pub fn new(round_secs: u32) -> Self {
        Self {
            score: 0,
            total_words: 0,
            correct_words: 0,
            total_chars: 0,
            streak: 0,
            best_streak: 0,
            time_remaining: round_secs,
            accuracy: 100,
            wpm: 0,
        }
    }

    pub fn apply(self, event: &GameEvent) -> Self {
        match event {
            GameEvent::Completed(word) => {
                let len = word.len() as u64;
                let correct_words = self.correct_words + 1;
                let total_words = self.total_words + 1;
                let streak = self.streak + 1;
                Self {
                    score: self.score + len * 10,
                    correct_words,
                    total_words,
                    total_chars: self.total_chars + len,
                    streak,
                    best_streak: self.best_streak.max(streak),
                    accuracy: accuracy(correct_words, total_words),
                    ..self
                }
            }
            GameEvent::Missed(_) => {
                let total_words = self.total_words + 1;
                Self {
                    total_words,
                    streak: 0,
                    accuracy: accuracy(self.correct_words, total_words),
                    ..self
                }
            }
            GameEvent::Mismatch => Self { streak: 0, ..self },
        }
    }

    pub fn with_wpm(self, elapsed: Duration) -> Self {
        Self {
            wpm: words_per_minute(self.total_chars, elapsed),
            ..self
        }
    }

    pub fn with_time_remaining(self, time_remaining: u32) -> Self {
        Self {
            time_remaining,
            ..self
        }
    }
}

/// Whole percentage of resolved words that were typed, 100 before any word
/// has been resolved
pub fn accuracy(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    let pct = (f64::from(correct.min(total)) / f64::from(total) * 100.0).round();
    pct as u32
}

/// Standard five-characters-per-word typing speed, 0 while no time has passed
pub fn words_per_minute(total_chars: u64, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    (total_chars as f64 / 5.0 / minutes).round() as u32
}

/// Horizontal car position in percent: 0-100 wpm maps onto 10-90%
pub fn car_position(wpm: u32, playing: bool) -> f64 {
    if !playing {
        return 10.0;
    }
    (f64::from(wpm) / 100.0 * 80.0 + 10.0).clamp(10.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        Word {
            id: 0,
            text: text.to_string(),
            left: 50.0,
            top: 10.0,
        }
    }

    #[test]
    fn test_initial_values() {
        let stats = SessionStats::new(60);

        assert_eq!(stats.score, 0);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.time_remaining, 60);
    }

    #[test]
    fn test_completion() {
        let stats = SessionStats::new(60).apply(&GameEvent::Completed(word("cat")));

        assert_eq!(stats.score, 30);
        assert_eq!(stats.correct_words, 1);
        assert_eq!(stats.total_words, 1);
        assert_eq!(stats.total_chars, 3);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_miss() {
        let stats = SessionStats::new(60)
            .apply(&GameEvent::Completed(word("cat")))
            .apply(&GameEvent::Missed(word("dog")));

        assert_eq!(stats.score, 30);
        assert_eq!(stats.correct_words, 1);
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.total_chars, 3);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.accuracy, 50);
    }

    #[test]
    fn test_miss_only() {
        let stats = SessionStats::new(60).apply(&GameEvent::Missed(word("cat")));

        assert_eq!(stats.total_words, 1);
        assert_eq!(stats.correct_words, 0);
        assert_eq!(stats.accuracy, 0);
    }

    #[test]
    fn test_mismatch_only_resets_streak() {
        let before = SessionStats::new(60)
            .apply(&GameEvent::Completed(word("cat")))
            .apply(&GameEvent::Completed(word("react")));
        assert_eq!(before.streak, 2);

        let after = before.clone().apply(&GameEvent::Mismatch);
        assert_eq!(after.streak, 0);
        assert_eq!(after, SessionStats { streak: 0, ..before });
    }

    #[test]
    fn test_streak_counts_consecutive_completions() {
        let mut stats = SessionStats::new(60);
        for expected in 1..=5 {
            stats = stats.apply(&GameEvent::Completed(word("api")));
            assert_eq!(stats.streak, expected);
        }
        stats = stats.apply(&GameEvent::Mismatch);
        stats = stats.apply(&GameEvent::Completed(word("api")));
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 5);
    }

    #[test]
    fn test_accuracy_rounding() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 8), 13);
        assert_eq!(accuracy(5, 5), 100);
    }

    #[test]
    fn test_accuracy_bounds() {
        for total in 0..20 {
            for correct in 0..=total {
                assert!(accuracy(correct, total) <= 100);
            }
        }
    }

    #[test]
    fn test_words_per_minute() {
        assert_eq!(words_per_minute(100, Duration::ZERO), 0);
        assert_eq!(words_per_minute(0, Duration::from_secs(10)), 0);
        // 50 chars = 10 words in half a minute
        assert_eq!(words_per_minute(50, Duration::from_secs(30)), 20);
        // 3 chars in 1s = 0.6 words / (1/60) min = 36
        assert_eq!(words_per_minute(3, Duration::from_secs(1)), 36);
    }

    #[test]
    fn test_with_wpm() {
        let stats = SessionStats::new(60)
            .apply(&GameEvent::Completed(word("javascript")))
            .with_wpm(Duration::from_secs(12));

        // 10 chars = 2 words in 0.2 min
        assert_eq!(stats.wpm, 10);
        assert_eq!(stats.with_wpm(Duration::ZERO).wpm, 0);
    }

    #[test]
    fn test_car_position() {
        assert_eq!(car_position(0, true), 10.0);
        assert_eq!(car_position(50, true), 50.0);
        assert_eq!(car_position(100, true), 90.0);
        assert_eq!(car_position(250, true), 90.0);
        assert_eq!(car_position(80, false), 10.0);
    }
}
