use anyhow::{anyhow, ensure, Context};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

static VOCAB_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/vocab");

pub const DEFAULT_VOCABULARY: &str = "developer";

/// The fixed word list words are drawn from
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Vocabulary {
    pub name: String,
    #[serde(default)]
    pub size: u32,
    pub words: Vec<String>,
}

impl Vocabulary {
    /// Load one of the word lists bundled with the binary
    pub fn embedded(name: &str) -> anyhow::Result<Self> {
        let file_name = format!("{name}.json");
        let file = VOCAB_DIR
            .get_file(&file_name)
            .ok_or_else(|| anyhow!("unknown vocabulary '{name}'"))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| anyhow!("vocabulary '{name}' is not valid utf-8"))?;
        Self::parse(contents).with_context(|| format!("loading vocabulary '{name}'"))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading vocabulary {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("loading vocabulary {}", path.display()))
    }

    pub fn from_words<I, S>(name: &str, words: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            size: 0,
            words: words.into_iter().map(Into::<String>::into).collect(),
        }
        .normalized()
    }

    fn parse(contents: &str) -> anyhow::Result<Self> {
        let vocab: Self = serde_json::from_str(contents)?;
        vocab.normalized()
    }

    /// Trim every word, drop blank ones and refuse an empty list
    fn normalized(mut self) -> anyhow::Result<Self> {
        self.words = self
            .words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        self.size = self.words.len() as u32;
        ensure!(!self.words.is_empty(), "vocabulary '{}' has no words", self.name);
        Ok(self)
    }

    /// Uniformly pick a word
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // never empty once constructed
        self.words.choose(rng).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
