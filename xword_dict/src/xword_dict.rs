use std::{
  borrow::Borrow,
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
};

use itertools::Itertools;
use log::debug;
use util::error::{XWordError, XWordResult};

/// The vocabulary a crossword is filled from. Words are canonicalized to
/// upper case and kept sorted and unique, so a word's index is stable for a
/// given list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordList {
  words: Vec<String>,
}

impl WordList {
  fn canonicalize_word(word: &str) -> Option<String> {
    let word = word.trim();
    (!word.is_empty()).then(|| word.to_uppercase())
  }

  pub fn from_words<S>(words: impl IntoIterator<Item = S>) -> Self
  where
    S: Borrow<str>,
  {
    Self {
      words: words
        .into_iter()
        .filter_map(|word| Self::canonicalize_word(word.borrow()))
        .sorted()
        .dedup()
        .collect(),
    }
  }

  /// Parses a word list with one word per line. Blank lines are skipped.
  /// Words may not contain interior whitespace.
  pub fn parse_lines<S>(lines: impl IntoIterator<Item = S>) -> XWordResult<Self>
  where
    S: Borrow<str>,
  {
    let words = lines
      .into_iter()
      .enumerate()
      .map(|(line_no, line)| {
        let word = line.borrow().trim();
        if word.chars().any(char::is_whitespace) {
          return Err(
            XWordError::Parse(format!("Line {}: \"{word}\" is not a single word", line_no + 1))
              .into(),
          );
        }
        Ok(word.to_owned())
      })
      .collect::<XWordResult<Vec<_>>>()?;

    Ok(Self::from_words(words))
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> XWordResult<Self> {
    let path = path.as_ref();
    let lines = BufReader::new(File::open(path)?)
      .lines()
      .collect::<Result<Vec<_>, _>>()?;
    let list = Self::parse_lines(lines)?;
    debug!("Loaded {} words from {}", list.len(), path.display());
    Ok(list)
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn get(&self, id: usize) -> Option<&str> {
    self.words.get(id).map(|word| word.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.words.iter().map(|word| word.as_str())
  }

  pub fn contains(&self, word: &str) -> bool {
    Self::canonicalize_word(word)
      .is_some_and(|word| self.words.binary_search(&word).is_ok())
  }
}
