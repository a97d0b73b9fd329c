use log::debug;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike, MutGridlike},
  pos::Pos,
};

use crate::slot::{Direction, GridModel, SlotId};

/// The shared cell of two slots, as an offset into each slot's word.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Overlap {
  pub first: u32,
  pub second: u32,
}

/// Precomputed crossings between every pair of slots. Read-only once built.
#[derive(Clone, Debug)]
pub struct OverlapIndex {
  slot_count: usize,
  /// Row-major `slot_count x slot_count` table, `table[x][y]` giving the
  /// overlap with offsets ordered `(x, y)`.
  table: Vec<Option<Overlap>>,
  neighbors: Vec<Vec<SlotId>>,
}

impl OverlapIndex {
  pub fn build(model: &GridModel) -> XWordResult<Self> {
    let board = model.board();
    let mut across: Grid<Option<(SlotId, u32)>> = Grid::new(board.width(), board.height());
    let mut down: Grid<Option<(SlotId, u32)>> = Grid::new(board.width(), board.height());

    for (id, slot) in model.slots().iter().enumerate() {
      let owners = match slot.direction {
        Direction::Across => &mut across,
        Direction::Down => &mut down,
      };
      for (idx, pos) in slot.cells().enumerate() {
        let owner = owners.get_mut(pos).ok_or_else(|| {
          XWordError::Internal(format!("Slot {slot} leaves the board at {pos}"))
        })?;
        if let Some((other, _)) = owner {
          return Err(
            XWordError::Internal(format!(
              "Parallel slots {slot} and {} share cell {pos}",
              model.slot(*other)
            ))
            .into(),
          );
        }
        *owner = Some((id, idx as u32));
      }
    }

    let slot_count = model.slot_count();
    let mut table = vec![None; slot_count * slot_count];
    let mut neighbors = vec![Vec::new(); slot_count];
    for pos in board.positions() {
      let (Some(&Some((a, i))), Some(&Some((d, j)))) = (across.get(pos), down.get(pos)) else {
        continue;
      };
      Self::record(&mut table, slot_count, a, d, Overlap { first: i, second: j }, pos)?;
      Self::record(&mut table, slot_count, d, a, Overlap { first: j, second: i }, pos)?;
      neighbors[a].push(d);
      neighbors[d].push(a);
    }
    for slot_neighbors in neighbors.iter_mut() {
      slot_neighbors.sort_unstable();
    }

    let index = Self { slot_count, table, neighbors };
    debug!("Built overlap index with {} crossings", index.edge_count());
    Ok(index)
  }

  fn record(
    table: &mut [Option<Overlap>],
    slot_count: usize,
    x: SlotId,
    y: SlotId,
    overlap: Overlap,
    pos: Pos,
  ) -> XWordResult {
    let entry = &mut table[x * slot_count + y];
    if let Some(existing) = entry {
      return Err(
        XWordError::Internal(format!(
          "Slots {x} and {y} cross twice: at offsets {existing:?} and again at {pos}"
        ))
        .into(),
      );
    }
    *entry = Some(overlap);
    Ok(())
  }

  /// The overlap of `x` and `y`, with offsets ordered `(x, y)`. `None` means
  /// there is no constraint between the two slots.
  pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<Overlap> {
    if x >= self.slot_count || y >= self.slot_count {
      return None;
    }
    self.table[x * self.slot_count + y]
  }

  /// All slots crossing `slot`, in id order.
  pub fn neighbors(&self, slot: SlotId) -> &[SlotId] {
    self.neighbors.get(slot).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn degree(&self, slot: SlotId) -> usize {
    self.neighbors(slot).len()
  }

  /// Number of crossing cells, i.e. unordered overlapping pairs.
  pub fn edge_count(&self) -> usize {
    self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
  }

  /// Every ordered pair of crossing slots.
  pub fn arcs(&self) -> impl Iterator<Item = (SlotId, SlotId)> + '_ {
    self
      .neighbors
      .iter()
      .enumerate()
      .flat_map(|(x, neighbors)| neighbors.iter().map(move |&y| (x, y)))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::pos::Pos;

  use crate::{
    layout::parse_layout,
    slot::{Direction, GridModel, Slot},
  };

  use super::{Overlap, OverlapIndex};

  fn build(layout: &str) -> (GridModel, OverlapIndex) {
    let model = GridModel::new(parse_layout(layout).unwrap()).unwrap();
    let index = OverlapIndex::build(&model).unwrap();
    (model, index)
  }

  #[gtest]
  fn test_cross() {
    let (model, index) = build(
      "#_#
       ___
       #_#",
    );
    let down = model
      .find_slot(&Slot { pos: Pos { x: 1, y: 0 }, direction: Direction::Down, length: 3 })
      .unwrap();
    let across = model
      .find_slot(&Slot { pos: Pos { x: 0, y: 1 }, direction: Direction::Across, length: 3 })
      .unwrap();
    expect_that!(
      index.overlap(across, down),
      some(eq(Overlap { first: 1, second: 1 }))
    );
    expect_that!(index.overlap(down, across), some(eq(Overlap { first: 1, second: 1 })));
    expect_that!(index.overlap(across, across), none());
    expect_that!(index.neighbors(across).to_vec(), container_eq([down]));
    expect_eq!(index.edge_count(), 1);
  }

  #[gtest]
  fn test_offsets_are_ordered() {
    let (model, index) = build(
      "___
       __#",
    );
    let top = model
      .find_slot(&Slot { pos: Pos::zero(), direction: Direction::Across, length: 3 })
      .unwrap();
    let right = model
      .find_slot(&Slot { pos: Pos { x: 1, y: 0 }, direction: Direction::Down, length: 2 })
      .unwrap();
    let bottom = model
      .find_slot(&Slot { pos: Pos { x: 0, y: 1 }, direction: Direction::Across, length: 2 })
      .unwrap();
    expect_that!(index.overlap(top, right), some(eq(Overlap { first: 1, second: 0 })));
    expect_that!(index.overlap(right, top), some(eq(Overlap { first: 0, second: 1 })));
    expect_that!(index.overlap(right, bottom), some(eq(Overlap { first: 1, second: 1 })));
    expect_that!(index.overlap(top, bottom), none());
    expect_eq!(index.degree(right), 2);
    expect_eq!(index.edge_count(), 4);
    expect_eq!(index.arcs().count(), 2 * index.edge_count());
  }

  #[gtest]
  fn test_no_overlaps() {
    let (model, index) = build(
      "___
       ###
       ___",
    );
    expect_eq!(model.slot_count(), 2);
    expect_eq!(index.edge_count(), 0);
    expect_true!(index.neighbors(0).is_empty());
  }
}
