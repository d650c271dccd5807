use crate::word_stream::Word;

/// Text the player has typed but not yet submitted
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Index of the first active word matching `input`, ignoring case and
/// surrounding whitespace. Blank input never matches.
pub fn find_match(words: &[Word], input: &str) -> Option<usize> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    words.iter().position(|w| w.text.to_lowercase() == needle)
}
