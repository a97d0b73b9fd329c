use std::{
  collections::{HashSet, VecDeque},
  error::Error,
  fmt::Display,
};

use log::{debug, trace};

use crate::{
  domain::{DomainStore, Vocabulary},
  overlap::OverlapIndex,
  slot::SlotId,
};

/// Arc consistency failed because a slot was left with no candidate words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainWipeout {
  pub slot: SlotId,
}

impl Display for DomainWipeout {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Domain of slot {} became empty", self.slot)
  }
}

impl Error for DomainWipeout {}

/// AC-3 over the overlap constraints of a puzzle.
pub struct ArcConsistency<'a> {
  overlaps: &'a OverlapIndex,
  vocabulary: &'a Vocabulary,
}

impl<'a> ArcConsistency<'a> {
  pub fn new(overlaps: &'a OverlapIndex, vocabulary: &'a Vocabulary) -> Self {
    Self { overlaps, vocabulary }
  }

  /// Removes every word from `x`'s domain that has no partner in `y`'s domain
  /// agreeing on their shared letter. Returns the number of words removed,
  /// which is always 0 if the slots do not cross.
  pub fn revise(&self, domains: &mut DomainStore, x: SlotId, y: SlotId) -> usize {
    let Some(overlap) = self.overlaps.overlap(x, y) else {
      return 0;
    };

    let supported: HashSet<char> = domains
      .domain(y)
      .iter()
      .filter_map(|&word| self.vocabulary.letter(word, overlap.second))
      .collect();
    domains.retain(x, |&word| {
      self
        .vocabulary
        .letter(word, overlap.first)
        .is_some_and(|letter| supported.contains(&letter))
    })
  }

  /// Makes every domain arc consistent, starting from every crossing arc when
  /// `arcs` is `None` and from just the given arcs otherwise. Given arcs whose
  /// slots don't cross are dropped. Whenever `x`
  /// shrinks while revising `(x, y)`, every arc `(z, x)` with `z != y` is
  /// revisited.
  ///
  /// Returns the total number of words pruned, or the first slot whose domain
  /// became empty.
  pub fn enforce(
    &self,
    domains: &mut DomainStore,
    arcs: Option<Vec<(SlotId, SlotId)>>,
  ) -> Result<usize, DomainWipeout> {
    let slot_count = domains.slot_count();
    let mut queue: VecDeque<(SlotId, SlotId)> = match arcs {
      Some(arcs) => arcs.into(),
      None => self.overlaps.arcs().collect(),
    };
    let mut queued = vec![false; slot_count * slot_count];
    // Arcs between slots that don't cross, including unknown slot ids, can
    // never prune anything.
    queue.retain(|&(x, y)| {
      if x >= slot_count || y >= slot_count || self.overlaps.overlap(x, y).is_none() {
        trace!("Skipping arc ({x}, {y}) with no crossing");
        return false;
      }
      !std::mem::replace(&mut queued[x * slot_count + y], true)
    });

    if let Some(slot) = (0..slot_count).find(|&slot| domains.is_empty(slot)) {
      return Err(DomainWipeout { slot });
    }

    let mut pruned = 0;
    while let Some((x, y)) = queue.pop_front() {
      queued[x * slot_count + y] = false;
      let removed = self.revise(domains, x, y);
      if removed == 0 {
        continue;
      }

      trace!("Revising ({x}, {y}) removed {removed} words");
      pruned += removed;
      if domains.is_empty(x) {
        debug!("AC-3 emptied the domain of slot {x}");
        return Err(DomainWipeout { slot: x });
      }

      for &z in self.overlaps.neighbors(x) {
        if z != y && !queued[z * slot_count + x] {
          queued[z * slot_count + x] = true;
          queue.push_back((z, x));
        }
      }
    }

    Ok(pruned)
  }
}
