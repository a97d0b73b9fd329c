use crate::{domain::WordId, slot::SlotId};

/// A partial mapping from slots to words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
  words: Vec<Option<WordId>>,
  assigned: usize,
}

impl Assignment {
  pub fn empty(slot_count: usize) -> Self {
    Self { words: vec![None; slot_count], assigned: 0 }
  }

  pub fn get(&self, slot: SlotId) -> Option<WordId> {
    self.words.get(slot).cloned().flatten()
  }

  pub fn is_assigned(&self, slot: SlotId) -> bool {
    self.get(slot).is_some()
  }

  /// Assigns `word` to `slot`, returning the word it replaced.
  pub fn assign(&mut self, slot: SlotId, word: WordId) -> Option<WordId> {
    let previous = self.words[slot].replace(word);
    if previous.is_none() {
      self.assigned += 1;
    }
    previous
  }

  pub fn unassign(&mut self, slot: SlotId) -> Option<WordId> {
    let previous = self.words[slot].take();
    if previous.is_some() {
      self.assigned -= 1;
    }
    previous
  }

  /// Number of assigned slots.
  pub fn len(&self) -> usize {
    self.assigned
  }

  pub fn is_empty(&self) -> bool {
    self.assigned == 0
  }

  pub fn slot_count(&self) -> usize {
    self.words.len()
  }

  pub fn is_complete(&self) -> bool {
    self.assigned == self.words.len()
  }

  /// Assigned `(slot, word)` pairs in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
    self
      .words
      .iter()
      .enumerate()
      .filter_map(|(slot, word)| word.map(|word| (slot, word)))
  }
}
