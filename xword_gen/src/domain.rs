use log::debug;
use xword_dict::WordList;

use crate::slot::{Slot, SlotId};

/// Index of a word within a `Vocabulary`.
pub type WordId = usize;

/// The words a puzzle may be filled with, stored as letter arrays for
/// constant-time lookup of the letter at an offset.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
  words: Vec<String>,
  letters: Vec<Vec<char>>,
}

impl Vocabulary {
  pub fn new(words: &WordList) -> Self {
    let words: Vec<_> = words.iter().map(str::to_owned).collect();
    let letters = words.iter().map(|word| word.chars().collect()).collect();
    Self { words, letters }
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn word(&self, id: WordId) -> &str {
    &self.words[id]
  }

  pub fn letters(&self, id: WordId) -> &[char] {
    &self.letters[id]
  }

  pub fn letter(&self, id: WordId, idx: u32) -> Option<char> {
    self.letters[id].get(idx as usize).cloned()
  }

  pub fn word_len(&self, id: WordId) -> usize {
    self.letters[id].len()
  }

  pub fn find(&self, word: &str) -> Option<WordId> {
    self.words.binary_search_by(|entry| entry.as_str().cmp(word)).ok()
  }
}

/// Candidate words for every slot. Domains only ever shrink, and each one is
/// kept sorted by `WordId`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainStore {
  domains: Vec<Vec<WordId>>,
}

impl DomainStore {
  /// A store in which every slot has an empty domain.
  pub fn uninitialized(slot_count: usize) -> Self {
    Self { domains: vec![Vec::new(); slot_count] }
  }

  /// Seeds every slot with the vocabulary words of exactly its length.
  pub fn with_node_consistency(slots: &[Slot], vocabulary: &Vocabulary) -> Self {
    let domains: Vec<Vec<WordId>> = slots
      .iter()
      .map(|slot| {
        (0..vocabulary.len())
          .filter(|&id| vocabulary.word_len(id) == slot.length as usize)
          .collect()
      })
      .collect();

    for (slot, domain) in slots.iter().zip(domains.iter()) {
      if domain.is_empty() {
        debug!("No words of length {} for slot {slot}", slot.length);
      }
    }
    Self { domains }
  }

  pub fn slot_count(&self) -> usize {
    self.domains.len()
  }

  pub fn domain(&self, slot: SlotId) -> &[WordId] {
    &self.domains[slot]
  }

  pub fn len(&self, slot: SlotId) -> usize {
    self.domains[slot].len()
  }

  pub fn is_empty(&self, slot: SlotId) -> bool {
    self.domains[slot].is_empty()
  }

  pub fn contains(&self, slot: SlotId, word: WordId) -> bool {
    self.domains[slot].binary_search(&word).is_ok()
  }

  /// Removes `word` from the slot's domain, returning whether it was present.
  pub fn remove(&mut self, slot: SlotId, word: WordId) -> bool {
    let domain = &mut self.domains[slot];
    match domain.binary_search(&word) {
      Ok(idx) => {
        domain.remove(idx);
        true
      }
      Err(_) => false,
    }
  }

  /// Keeps only the words of the slot's domain matching `keep`, returning the
  /// number of words removed.
  pub fn retain(&mut self, slot: SlotId, keep: impl FnMut(&WordId) -> bool) -> usize {
    let domain = &mut self.domains[slot];
    let before = domain.len();
    domain.retain(keep);
    before - domain.len()
  }

  pub fn total_size(&self) -> usize {
    self.domains.iter().map(Vec::len).sum()
  }
}
