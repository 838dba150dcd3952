use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum WordListError {
    #[error("cannot read word list {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list {} contains no words", .path.display())]
    Empty { path: PathBuf },
}

/// Words to draw prompts from. Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Read a newline-separated word file. Blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| WordListError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let list = Self::from_lines(&contents);
        if list.is_empty() {
            return Err(WordListError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), words = list.len(), "loaded word list");
        Ok(list)
    }

    pub fn from_lines(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Uniformly sample one word, `None` only for an empty list.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
