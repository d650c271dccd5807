use rand::Rng;
use std::time::Duration;

use crate::config::GameConfig;
use crate::vocabulary::Vocabulary;

/// A word falling down the lane
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub id: u64,
    pub text: String,
    /// horizontal position in percent of the lane width, fixed at spawn
    pub left: f64,
    /// vertical position in pixels; negative is above the visible area
    pub top: f64,
}

impl Word {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The active word set plus the spawn and fall bookkeeping
#[derive(Debug)]
pub struct WordStream {
    words: Vec<Word>,
    next_id: u64,
    since_spawn: Duration,
    vocabulary: Vocabulary,
    config: GameConfig,
}

impl WordStream {
    pub fn new(config: GameConfig, vocabulary: Vocabulary) -> Self {
        Self {
            words: Vec::new(),
            next_id: 0,
            since_spawn: Duration::ZERO,
            vocabulary,
            config,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.words.len() >= self.config.max_words
    }

    /// Spawn a random word from the vocabulary at a random horizontal offset
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Word> {
        if self.is_full() {
            return None;
        }
        let text = self.vocabulary.choose(rng).to_string();
        let left = rng.gen_range(self.config.spawn_left_min..=self.config.spawn_left_max);
        self.spawn_word(text, left)
    }

    /// Spawn a specific word above the visible area
    pub fn spawn_word(&mut self, text: impl Into<String>, left: f64) -> Option<&Word> {
        if self.is_full() {
            tracing::trace!("active set full, spawn suppressed");
            return None;
        }
        let word = Word {
            id: self.next_id,
            text: text.into(),
            left,
            top: self.config.spawn_top,
        };
        self.next_id += 1;
        self.words.push(word);
        self.words.last()
    }

    /// Advance every word by the fall rate for `elapsed`, then spawn one word
    /// per elapsed spawn interval. Returns the words that passed the miss line;
    /// they are no longer part of the active set.
    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) -> Vec<Word> {
        let step = self.config.fall_speed * elapsed.as_nanos() as f64
            / self.config.fall_tick().as_nanos() as f64;
        let miss_line = self.config.miss_line();

        let mut missed = Vec::new();
        let mut kept = Vec::with_capacity(self.words.len());
        for mut word in self.words.drain(..) {
            word.top += step;
            if word.top > miss_line {
                missed.push(word);
            } else {
                kept.push(word);
            }
        }
        self.words = kept;

        self.since_spawn += elapsed;
        let interval = self.config.spawn_interval();
        while self.since_spawn >= interval {
            self.since_spawn -= interval;
            self.spawn(rng);
        }

        missed
    }

    /// Remove and return the word at `index`
    pub fn take(&mut self, index: usize) -> Option<Word> {
        if index < self.words.len() {
            Some(self.words.remove(index))
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: u64) -> Option<Word> {
        let index = self.words.iter().position(|w| w.id == id)?;
        self.take(index)
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.since_spawn = Duration::ZERO;
    }
}
