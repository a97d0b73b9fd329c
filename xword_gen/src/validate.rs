use crate::{
  assignment::Assignment,
  domain::Vocabulary,
  overlap::OverlapIndex,
  slot::SlotId,
};

/// Checks assignments for distinct words and agreement at every crossing.
/// Word lengths are not checked: words only ever come from length-filtered
/// domains.
pub struct Validator<'a> {
  overlaps: &'a OverlapIndex,
  vocabulary: &'a Vocabulary,
}

impl<'a> Validator<'a> {
  pub fn new(overlaps: &'a OverlapIndex, vocabulary: &'a Vocabulary) -> Self {
    Self { overlaps, vocabulary }
  }

  /// Whether `x` and `y`, both assigned, agree on their shared letter. Slots
  /// that don't cross always agree.
  fn agrees(&self, assignment: &Assignment, x: SlotId, y: SlotId) -> bool {
    let (Some(x_word), Some(y_word)) = (assignment.get(x), assignment.get(y)) else {
      return true;
    };
    self.overlaps.overlap(x, y).is_none_or(|overlap| {
      self.vocabulary.letter(x_word, overlap.first)
        == self.vocabulary.letter(y_word, overlap.second)
    })
  }

  /// Checks only the constraints involving `slot`, assuming the rest of
  /// `assignment` was already consistent.
  pub fn is_consistent_extension(&self, assignment: &Assignment, slot: SlotId) -> bool {
    let Some(word) = assignment.get(slot) else {
      return true;
    };

    let distinct = assignment
      .iter()
      .all(|(other, other_word)| other == slot || other_word != word);
    distinct
      && self
        .overlaps
        .neighbors(slot)
        .iter()
        .all(|&neighbor| self.agrees(assignment, slot, neighbor))
  }

  /// Checks every constraint of `assignment`.
  pub fn is_consistent(&self, assignment: &Assignment) -> bool {
    let mut words: Vec<_> = assignment.iter().map(|(_, word)| word).collect();
    let assigned = words.len();
    words.sort_unstable();
    words.dedup();
    if words.len() != assigned {
      return false;
    }

    self
      .overlaps
      .arcs()
      .all(|(x, y)| x > y || self.agrees(assignment, x, y))
  }
}
