use std::{
  cmp::Reverse,
  collections::HashMap,
  error::Error,
  fmt::Display,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  time::{Duration, Instant},
};

use itertools::Itertools;
use log::trace;

use crate::{
  assignment::Assignment,
  domain::{DomainStore, Vocabulary, WordId},
  overlap::OverlapIndex,
  slot::{GridModel, SlotId},
  validate::Validator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveFailure {
  /// No assignment satisfies every constraint.
  Unsatisfiable,
  /// The search was interrupted before it could finish.
  Cancelled,
}

impl Display for SolveFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SolveFailure::Unsatisfiable => write!(f, "No solution"),
      SolveFailure::Cancelled => write!(f, "Search cancelled"),
    }
  }
}

impl Error for SolveFailure {}

/// Conditions under which a running search gives up. Checked once per
/// search step.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
  deadline: Option<Instant>,
  flag: Option<Arc<AtomicBool>>,
}

impl Interrupt {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn with_deadline(self, deadline: Instant) -> Self {
    Self { deadline: Some(deadline), ..self }
  }

  pub fn with_timeout(self, timeout: Duration) -> Self {
    self.with_deadline(Instant::now() + timeout)
  }

  /// Cancels the search once `flag` is set.
  pub fn with_flag(self, flag: Arc<AtomicBool>) -> Self {
    Self { flag: Some(flag), ..self }
  }

  pub fn triggered(&self) -> bool {
    self.flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
      || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
  /// Words removed from domains by arc consistency.
  pub pruned: usize,
  /// Partial assignments visited.
  pub states: u64,
  /// Tentative assignments undone.
  pub backtracks: u64,
}

/// Depth-first backtracking over slot assignments. Reads, but never
/// modifies, the domains it is given.
pub struct Search<'a> {
  model: &'a GridModel,
  overlaps: &'a OverlapIndex,
  vocabulary: &'a Vocabulary,
  domains: &'a DomainStore,
  validator: Validator<'a>,
  interrupt: &'a Interrupt,
  stats: Statistics,
}

impl<'a> Search<'a> {
  pub fn new(
    model: &'a GridModel,
    overlaps: &'a OverlapIndex,
    vocabulary: &'a Vocabulary,
    domains: &'a DomainStore,
    interrupt: &'a Interrupt,
  ) -> Self {
    Self {
      model,
      overlaps,
      vocabulary,
      domains,
      validator: Validator::new(overlaps, vocabulary),
      interrupt,
      stats: Statistics::default(),
    }
  }

  pub fn stats(&self) -> &Statistics {
    &self.stats
  }

  pub fn into_stats(self) -> Statistics {
    self.stats
  }

  /// Searches for the first complete, consistent assignment.
  pub fn run(&mut self) -> Result<Assignment, SolveFailure> {
    let mut assignment = Assignment::empty(self.model.slot_count());
    self.backtrack(&mut assignment)?;
    Ok(assignment)
  }

  /// Extends `assignment` to a complete one in place. On failure,
  /// `assignment` is left as it was.
  fn backtrack(&mut self, assignment: &mut Assignment) -> Result<(), SolveFailure> {
    if self.interrupt.triggered() {
      return Err(SolveFailure::Cancelled);
    }
    self.stats.states += 1;

    let Some(slot) = self.select_unassigned_slot(assignment) else {
      return Ok(());
    };

    for word in self.order_domain_values(slot, assignment) {
      assignment.assign(slot, word);
      if self.validator.is_consistent_extension(assignment, slot) {
        trace!(
          "Trying {} at {}",
          self.vocabulary.word(word),
          self.model.slot(slot)
        );
        match self.backtrack(assignment) {
          Ok(()) => return Ok(()),
          Err(SolveFailure::Unsatisfiable) => {}
          Err(SolveFailure::Cancelled) => {
            assignment.unassign(slot);
            return Err(SolveFailure::Cancelled);
          }
        }
      }
      assignment.unassign(slot);
      self.stats.backtracks += 1;
    }

    Err(SolveFailure::Unsatisfiable)
  }

  /// Picks the unassigned slot with the fewest remaining words, preferring
  /// the slot with the most crossings and then the lowest id (reading order,
  /// across before down). Returns `None` once every slot is assigned.
  pub fn select_unassigned_slot(&self, assignment: &Assignment) -> Option<SlotId> {
    self
      .model
      .slot_ids()
      .filter(|&slot| !assignment.is_assigned(slot))
      .min_by_key(|&slot| {
        (
          self.domains.len(slot),
          Reverse(self.overlaps.degree(slot)),
          slot,
        )
      })
  }

  /// Orders `slot`'s words by how many words they would rule out of the
  /// domains of unassigned neighbors, fewest first. A neighbor's word is
  /// ruled out if it disagrees at the crossing or is the same word. Ties keep
  /// domain order.
  pub fn order_domain_values(&self, slot: SlotId, assignment: &Assignment) -> Vec<WordId> {
    let neighbors: Vec<_> = self
      .overlaps
      .neighbors(slot)
      .iter()
      .filter(|&&neighbor| !assignment.is_assigned(neighbor))
      .filter_map(|&neighbor| {
        let overlap = self.overlaps.overlap(slot, neighbor)?;
        let letter_counts: HashMap<char, usize> = self
          .domains
          .domain(neighbor)
          .iter()
          .filter_map(|&word| self.vocabulary.letter(word, overlap.second))
          .counts();
        Some((neighbor, overlap, letter_counts))
      })
      .collect();

    self
      .domains
      .domain(slot)
      .iter()
      .cloned()
      .sorted_by_cached_key(|&word| {
        neighbors
          .iter()
          .map(|(neighbor, overlap, letter_counts)| {
            let letter = self.vocabulary.letter(word, overlap.first);
            let compatible = letter
              .and_then(|letter| letter_counts.get(&letter))
              .cloned()
              .unwrap_or(0);
            let same_word_compatible = self.domains.contains(*neighbor, word)
              && letter == self.vocabulary.letter(word, overlap.second);
            self.domains.len(*neighbor) - compatible + same_word_compatible as usize
          })
          .sum::<usize>()
      })
      .collect()
  }
}
