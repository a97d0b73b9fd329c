use std::fmt::Display;

use log::debug;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike},
  pos::{Diff, Pos},
};

/// Index of a slot within its `GridModel`. Slots are numbered in reading
/// order of their first cell, across before down.
pub type SlotId = usize;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
  Across,
  Down,
}

impl Direction {
  pub const fn step(&self) -> Diff {
    match self {
      Direction::Across => Diff { x: 1, y: 0 },
      Direction::Down => Diff { x: 0, y: 1 },
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Direction::Across => write!(f, "across"),
      Direction::Down => write!(f, "down"),
    }
  }
}

/// A maximal run of fillable cells in one direction. Two slots are equal iff
/// they start at the same cell, run the same way and have the same length.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
  pub pos: Pos,
  pub direction: Direction,
  pub length: u32,
}

impl Slot {
  pub fn cell(&self, idx: u32) -> Pos {
    debug_assert!(idx < self.length);
    self.pos + idx as i32 * self.direction.step()
  }

  pub fn cells(&self) -> impl Iterator<Item = Pos> + use<'_> {
    (0..self.length).map(move |idx| self.cell(idx))
  }
}

impl Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {} ({})", self.pos, self.direction, self.length)
  }
}

struct Run {
  pos: Pos,
  length: u32,
}

/// The static geometry of a puzzle: which cells are fillable, and the slots
/// derived from them.
#[derive(Clone, Debug)]
pub struct GridModel {
  board: Grid<bool>,
  slots: Vec<Slot>,
}

impl GridModel {
  pub fn new(board: Grid<bool>) -> XWordResult<Self> {
    if !board.iter().any(|&available| available) {
      return Err(XWordError::Config("Board has no fillable cells".to_owned()).into());
    }

    let mut slots: Vec<_> = Self::iterate_board_row_runs(&board)
      .map(|Run { pos, length }| Slot { pos, direction: Direction::Across, length })
      .chain(
        Self::iterate_board_row_runs(board.transpose()).map(|Run { pos, length }| Slot {
          pos: pos.transpose(),
          direction: Direction::Down,
          length,
        }),
      )
      .filter(|slot| slot.length >= 2)
      .collect();
    slots.sort();

    debug!(
      "Found {} slots on a {}x{} board",
      slots.len(),
      board.width(),
      board.height()
    );
    Ok(Self { board, slots })
  }

  /// Yields every run of consecutive fillable cells in each row, including
  /// runs of length 1.
  fn iterate_board_row_runs<'a, G: Gridlike<bool> + 'a>(
    board: G,
  ) -> impl Iterator<Item = Run> + 'a {
    struct FillableSequences<I> {
      x: u32,
      y: u32,
      iter: Option<I>,
    }

    impl<I> Iterator for FillableSequences<I>
    where
      I: Iterator<Item = bool>,
    {
      type Item = Run;

      fn next(&mut self) -> Option<Run> {
        let iter = self.iter.as_mut()?;

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => break,
            Some(false) => {}
            None => return None,
          }
        }
        let mut length = 1;
        let pos = Pos { x: (self.x - 1) as i32, y: self.y as i32 };

        loop {
          self.x += 1;
          match iter.next() {
            Some(true) => length += 1,
            Some(false) => break,
            None => {
              self.iter = None;
              break;
            }
          }
        }

        Some(Run { pos, length })
      }
    }

    (0..board.height()).flat_map(move |y| {
      let runs: Vec<_> =
        FillableSequences { x: 0, y, iter: Some(board.iter_row(y).cloned()) }.collect();
      runs
    })
  }

  pub fn board(&self) -> &Grid<bool> {
    &self.board
  }

  pub fn available(&self, pos: Pos) -> bool {
    self.board.get(pos).is_some_and(|&available| available)
  }

  pub fn slots(&self) -> &[Slot] {
    &self.slots
  }

  pub fn slot(&self, id: SlotId) -> &Slot {
    &self.slots[id]
  }

  pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> {
    0..self.slots.len()
  }

  pub fn slot_count(&self) -> usize {
    self.slots.len()
  }

  pub fn find_slot(&self, slot: &Slot) -> Option<SlotId> {
    self.slots.binary_search(slot).ok()
  }
}
