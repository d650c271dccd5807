use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::matcher::{find_match, InputBuffer};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::stats::{car_position, GameEvent, SessionStats};
use crate::vocabulary::Vocabulary;
use crate::word_stream::{Word, WordStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Waiting,
    Playing,
    #[strum(serialize = "Game Over")]
    GameOver,
}

/// The three periodic timers a round runs on
#[derive(Debug, Clone, Copy)]
struct RoundTimers {
    countdown: TimerHandle,
    stream: TimerHandle,
    wpm: TimerHandle,
}

/// Owns all game state for one player and drives it through rounds
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    state: SessionState,
    stats: SessionStats,
    stream: WordStream,
    input: InputBuffer,
    scheduler: Scheduler,
    timers: Option<RoundTimers>,
    started_at: Option<Duration>,
    rng: StdRng,
}

impl Session {
    pub fn new(config: GameConfig, vocabulary: Vocabulary) -> Self {
        Self::with_rng(config, vocabulary, StdRng::from_entropy())
    }

    pub fn with_seed(config: GameConfig, vocabulary: Vocabulary, seed: u64) -> Self {
        Self::with_rng(config, vocabulary, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, vocabulary: Vocabulary, rng: StdRng) -> Self {
        Self {
            stats: SessionStats::new(config.round_secs),
            stream: WordStream::new(config.clone(), vocabulary),
            config,
            state: SessionState::Waiting,
            input: InputBuffer::new(),
            scheduler: Scheduler::new(),
            timers: None,
            started_at: None,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn words(&self) -> &[Word] {
        self.stream.words()
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn car_position(&self) -> f64 {
        car_position(self.stats.wpm, self.is_playing())
    }

    /// Time since the round started on the session clock
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|t| self.scheduler.now().saturating_sub(t))
            .unwrap_or_default()
    }

    pub fn has_active_timers(&self) -> bool {
        self.timers.is_some() || self.scheduler.active_count() > 0
    }

    /// Begin a round from Waiting or GameOver
    pub fn start(&mut self) {
        if self.state == SessionState::Playing {
            trace!("start ignored while playing");
            return;
        }
        self.release_timers();
        self.clear_round();
        self.started_at = Some(self.scheduler.now());
        self.timers = Some(RoundTimers {
            countdown: self.scheduler.every(self.config.countdown_interval()),
            stream: self.scheduler.every(self.config.fall_tick()),
            wpm: self.scheduler.every(self.config.wpm_interval()),
        });
        self.state = SessionState::Playing;
        info!(round_secs = self.config.round_secs, "round started");
    }

    /// Stop the round early
    pub fn end(&mut self) {
        if self.state != SessionState::Playing {
            trace!(state = %self.state, "end ignored");
            return;
        }
        self.finish();
    }

    /// Go back to Waiting after a round is over
    pub fn reset(&mut self) {
        if self.state != SessionState::GameOver {
            trace!(state = %self.state, "reset ignored");
            return;
        }
        self.release_timers();
        self.clear_round();
        self.started_at = None;
        self.state = SessionState::Waiting;
        info!("session reset");
    }

    /// Release every timer, e.g. when the whole game shuts down
    pub fn shutdown(&mut self) {
        if self.timers.is_some() {
            debug!("releasing round timers on shutdown");
        }
        self.release_timers();
    }

    pub fn type_char(&mut self, c: char) {
        if self.is_playing() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_playing() {
            self.input.backspace();
        }
    }

    /// Submit the pending input. Blank input is ignored; anything else is
    /// resolved against the active words and clears the buffer.
    pub fn submit(&mut self) -> Option<GameEvent> {
        if !self.is_playing() {
            trace!("submit ignored outside a round");
            return None;
        }
        if self.input.is_blank() {
            return None;
        }

        let event = find_match(self.stream.words(), self.input.as_str())
            .and_then(|index| self.stream.take(index))
            .map_or(GameEvent::Mismatch, GameEvent::Completed);
        self.input.clear();
        self.record(&event);
        Some(event)
    }

    /// Spawn one word right away
    pub fn spawn(&mut self) -> Option<&Word> {
        if !self.is_playing() {
            return None;
        }
        self.stream.spawn(&mut self.rng)
    }

    /// Spawn a specific word at `left` percent
    pub fn spawn_word(&mut self, text: &str, left: f64) -> Option<&Word> {
        if !self.is_playing() {
            return None;
        }
        self.stream.spawn_word(text, left)
    }

    /// Run the word stream for `elapsed`: fall, misses and interval spawns
    pub fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        if !self.is_playing() {
            return Vec::new();
        }
        let events: Vec<GameEvent> = self
            .stream
            .tick(elapsed, &mut self.rng)
            .into_iter()
            .map(GameEvent::Missed)
            .collect();
        for event in &events {
            self.record(event);
        }
        events
    }

    /// Let `dt` pass on the session clock, running every timer that falls due
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        let deadline = self.scheduler.now() + dt;
        let mut events = Vec::new();

        while let Some(handle) = self.scheduler.poll(deadline) {
            let Some(timers) = self.timers else {
                // the session no longer owns this timer
                self.scheduler.cancel(handle);
                continue;
            };

            if handle == timers.countdown {
                self.on_countdown();
            } else if handle == timers.stream {
                events.extend(self.tick(self.config.fall_tick()));
            } else if handle == timers.wpm {
                self.on_wpm_interval();
            } else {
                self.scheduler.cancel(handle);
            }
        }
        self.scheduler.settle(deadline);

        events
    }

    fn on_countdown(&mut self) {
        let remaining = self.stats.time_remaining.saturating_sub(1);
        self.stats = self.stats.clone().with_time_remaining(remaining);
        trace!(remaining, "countdown");
        if remaining == 0 {
            self.finish();
        }
    }

    fn on_wpm_interval(&mut self) {
        let elapsed = self.elapsed();
        self.stats = self.stats.clone().with_wpm(elapsed);
    }

    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Completed(word) => debug!(word = %word.text, "word completed"),
            GameEvent::Missed(word) => debug!(word = %word.text, "word missed"),
            GameEvent::Mismatch => debug!("submission matched no word"),
        }
        self.stats = self.stats.clone().apply(event);
    }

    fn finish(&mut self) {
        self.release_timers();
        // the results screen shows the rate at the moment the round stopped
        self.on_wpm_interval();
        self.state = SessionState::GameOver;
        info!(
            score = self.stats.score,
            wpm = self.stats.wpm,
            accuracy = self.stats.accuracy,
            best_streak = self.stats.best_streak,
            "round over"
        );
    }

    fn release_timers(&mut self) {
        if let Some(timers) = self.timers.take() {
            self.scheduler.cancel(timers.countdown);
            self.scheduler.cancel(timers.stream);
            self.scheduler.cancel(timers.wpm);
        }
    }

    fn clear_round(&mut self) {
        self.stats = SessionStats::new(self.config.round_secs);
        self.stream.clear();
        self.input.clear();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(words: &[&str]) -> Session {
        Session::with_seed(
            GameConfig::default(),
            Vocabulary::from_words("test", words.iter().copied()).unwrap(),
            11,
        )
    }

    fn type_str(s: &mut Session, text: &str) {
        for c in text.chars() {
            s.type_char(c);
        }
    }

    #[test]
    fn test_new_session_is_waiting() {
        let s = session(&["cat"]);

        assert_eq!(s.state(), SessionState::Waiting);
        assert_eq!(s.stats(), &SessionStats::new(60));
        assert!(s.words().is_empty());
        assert!(!s.has_active_timers());
        assert_eq!(s.car_position(), 10.0);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Waiting.to_string(), "Waiting");
        assert_eq!(SessionState::GameOver.to_string(), "Game Over");
    }

    #[test]
    fn test_start_acquires_timers() {
        let mut s = session(&["cat"]);
        s.start();

        assert_eq!(s.state(), SessionState::Playing);
        assert!(s.has_active_timers());
        assert_eq!(s.scheduler.active_count(), 3);
    }

    #[test]
    fn test_commands_ignored_outside_round() {
        let mut s = session(&["cat"]);

        type_str(&mut s, "cat");
        assert_eq!(s.input(), "");
        assert!(s.submit().is_none());
        assert!(s.spawn().is_none());
        assert!(s.tick(ms(5000)).is_empty());
        assert!(s.advance(ms(5000)).is_empty());
        s.end();
        assert_eq!(s.state(), SessionState::Waiting);
        s.reset();
        assert_eq!(s.state(), SessionState::Waiting);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);
        type_str(&mut s, "cat");
        s.submit();

        s.start();
        assert_eq!(s.stats().score, 30);
        assert_eq!(s.scheduler.active_count(), 3);
    }

    #[test]
    fn test_completion_through_submit() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);

        type_str(&mut s, "CAT ");
        let event = s.submit();

        assert_matches!(event, Some(GameEvent::Completed(ref w)) if w.text == "cat");
        assert!(s.words().is_empty());
        assert_eq!(s.input(), "");
        assert_eq!(s.stats().score, 30);
        assert_eq!(s.stats().streak, 1);
    }

    #[test]
    fn test_mismatch_clears_input_and_keeps_words() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);

        type_str(&mut s, "dog");
        assert_matches!(s.submit(), Some(GameEvent::Mismatch));
        assert_eq!(s.input(), "");
        assert_eq!(s.words().len(), 1);
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut s = session(&["cat"]);
        s.start();
        type_str(&mut s, "   ");

        assert!(s.submit().is_none());
        assert_eq!(s.input(), "   ");
        assert_eq!(s.stats(), &SessionStats::new(60));
    }

    #[test]
    fn test_backspace() {
        let mut s = session(&["cat"]);
        s.start();
        type_str(&mut s, "cab");
        s.backspace();

        assert_eq!(s.input(), "ca");
    }

    #[test]
    fn test_spawn_first_word_after_interval() {
        let mut s = session(&["cat"]);
        s.start();

        s.advance(ms(1999));
        assert!(s.words().is_empty());
        s.advance(ms(1));
        assert_eq!(s.words().len(), 1);
        assert_eq!(s.words()[0].top, -30.0);
    }

    #[test]
    fn test_countdown_decrements_each_second() {
        let mut s = session(&["cat"]);
        s.start();

        s.advance(ms(999));
        assert_eq!(s.stats().time_remaining, 60);
        s.advance(ms(1));
        assert_eq!(s.stats().time_remaining, 59);
        s.advance(ms(10_000));
        assert_eq!(s.stats().time_remaining, 49);
    }

    #[test]
    fn test_round_times_out() {
        let mut s = session(&["cat"]);
        s.start();

        s.advance(ms(60_000));
        assert_eq!(s.state(), SessionState::GameOver);
        assert_eq!(s.stats().time_remaining, 0);
        assert!(!s.has_active_timers());
    }

    #[test]
    fn test_no_effect_after_time_out() {
        let mut s = session(&["cat"]);
        s.start();
        s.advance(ms(60_000));

        let stats = s.stats().clone();
        let words = s.words().to_vec();
        assert!(s.advance(ms(30_000)).is_empty());
        assert_eq!(s.stats(), &stats);
        assert_eq!(s.words(), words.as_slice());
    }

    #[test]
    fn test_timeout_inside_single_advance_stops_later_timers() {
        let mut s = session(&["cat"]);
        s.start();

        // one big step crosses the end of the round; nothing after it may run
        s.advance(ms(120_000));
        assert_eq!(s.state(), SessionState::GameOver);
        assert_eq!(s.stats().time_remaining, 0);
        assert_eq!(s.elapsed(), ms(120_000));
        assert!(s.words().len() <= 8);
    }

    #[test]
    fn test_end_releases_timers() {
        let mut s = session(&["cat"]);
        s.start();
        s.advance(ms(2500));
        s.end();

        assert_eq!(s.state(), SessionState::GameOver);
        assert!(!s.has_active_timers());
        let stats = s.stats().clone();
        s.advance(ms(10_000));
        assert_eq!(s.stats(), &stats);
    }

    #[test]
    fn test_reset_restores_initial_stats() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);
        type_str(&mut s, "cat");
        s.submit();
        s.advance(ms(5_000));
        s.end();
        s.reset();

        assert_eq!(s.state(), SessionState::Waiting);
        assert_eq!(s.stats(), &SessionStats::new(60));
        assert!(s.words().is_empty());
        assert_eq!(s.input(), "");
        assert!(!s.has_active_timers());
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);
        type_str(&mut s, "cat");
        s.submit();
        s.end();

        s.start();
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.stats(), &SessionStats::new(60));
        assert_eq!(s.elapsed(), Duration::ZERO);
        assert_eq!(s.scheduler.active_count(), 3);
    }

    #[test]
    fn test_wpm_recomputed_on_interval() {
        let mut s = session(&["javascript"]);
        s.start();
        s.spawn_word("javascript", 50.0);
        s.advance(ms(500));
        type_str(&mut s, "javascript");
        s.submit();

        // not recomputed until the interval fires
        assert_eq!(s.stats().wpm, 0);
        s.advance(ms(500));
        // 10 chars = 2 words in 1/60 min
        assert_eq!(s.stats().wpm, 120);
        assert_eq!(s.car_position(), 90.0);

        s.advance(ms(1000));
        assert_eq!(s.stats().wpm, 60);
        assert_eq!(s.car_position(), 58.0);
    }

    #[test]
    fn test_wpm_final_when_round_ends_between_intervals() {
        let mut s = session(&["cat"]);
        s.start();
        s.spawn_word("cat", 50.0);
        s.advance(ms(500));
        type_str(&mut s, "cat");
        s.submit();
        s.advance(ms(400));
        assert_eq!(s.stats().wpm, 0);

        s.end();
        // 3 chars in 0.9 s
        assert_eq!(s.stats().score, 30);
        assert_eq!(s.stats().wpm, 40);
    }

    #[test]
    fn test_wpm_final_on_time_out() {
        let mut s = session(&["cat"]);
        s.start();
        s.advance(ms(59_500));
        s.spawn_word("cat", 50.0);
        type_str(&mut s, "cat");
        s.submit();

        s.advance(ms(500));
        assert_eq!(s.state(), SessionState::GameOver);
        // 3 chars over the full minute
        assert_eq!(s.stats().wpm, 1);
    }

    #[test]
    fn test_shutdown_releases_timers() {
        let mut s = session(&["cat"]);
        s.start();
        s.shutdown();

        assert!(!s.has_active_timers());
        assert!(s.advance(ms(10_000)).is_empty());
    }
}
