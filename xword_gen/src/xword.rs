use log::debug;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike, MutGridlike},
  pos::Pos,
};
use xword_dict::WordList;

use crate::{
  arc::{ArcConsistency, DomainWipeout},
  assignment::Assignment,
  domain::{DomainStore, Vocabulary, WordId},
  layout::parse_layout,
  overlap::OverlapIndex,
  search::{Interrupt, Search, SolveFailure, Statistics},
  slot::{GridModel, Slot, SlotId},
};

/// A crossword puzzle ready to be filled: its geometry, the crossings
/// between its slots and, once a vocabulary is loaded, the node-consistent
/// domain of each slot.
#[derive(Clone, Debug)]
pub struct XWord {
  model: GridModel,
  overlaps: OverlapIndex,
  vocabulary: Vocabulary,
  domains: DomainStore,
}

impl XWord {
  /// Builds the slots and overlap index for `board`, where `true` marks a
  /// fillable cell. No words are loaded yet.
  pub fn build(board: Grid<bool>) -> XWordResult<Self> {
    let model = GridModel::new(board)?;
    let overlaps = OverlapIndex::build(&model)?;
    let domains = DomainStore::uninitialized(model.slot_count());
    Ok(Self { model, overlaps, vocabulary: Vocabulary::default(), domains })
  }

  pub fn from_layout(layout: &str) -> XWordResult<Self> {
    Self::build(parse_layout(layout)?)
  }

  pub fn from_layout_with_words(layout: &str, words: &WordList) -> XWordResult<Self> {
    let mut xword = Self::from_layout(layout)?;
    xword.load_vocabulary(words);
    Ok(xword)
  }

  /// Replaces the vocabulary, seeding each slot with the words of its length.
  pub fn load_vocabulary(&mut self, words: &WordList) {
    self.vocabulary = Vocabulary::new(words);
    self.domains = DomainStore::with_node_consistency(self.model.slots(), &self.vocabulary);
    debug!(
      "Loaded {} words, {} candidates across {} slots",
      self.vocabulary.len(),
      self.domains.total_size(),
      self.model.slot_count()
    );
  }

  pub fn available(&self, pos: Pos) -> bool {
    self.model.available(pos)
  }

  pub fn board(&self) -> &Grid<bool> {
    self.model.board()
  }

  pub fn slots(&self) -> &[Slot] {
    self.model.slots()
  }

  pub fn slot(&self, id: SlotId) -> &Slot {
    self.model.slot(id)
  }

  pub fn neighbors(&self, id: SlotId) -> &[SlotId] {
    self.overlaps.neighbors(id)
  }

  /// The node-consistent domains, before any arc consistency is enforced.
  pub fn domains(&self) -> &DomainStore {
    &self.domains
  }

  pub fn vocabulary(&self) -> &Vocabulary {
    &self.vocabulary
  }

  /// A copy of the domains with arc consistency enforced over every
  /// crossing, along with the number of words pruned.
  pub fn arc_consistent_domains(&self) -> Result<(DomainStore, usize), DomainWipeout> {
    let mut domains = self.domains.clone();
    let pruned = ArcConsistency::new(&self.overlaps, &self.vocabulary).enforce(&mut domains, None)?;
    Ok((domains, pruned))
  }

  pub fn solve(&self) -> Result<Assignment, SolveFailure> {
    self.solve_with(&Interrupt::none()).0
  }

  /// Enforces arc consistency, then searches for the first complete
  /// assignment. Pruning lasts only for this call; the loaded domains are
  /// left untouched.
  pub fn solve_with(
    &self,
    interrupt: &Interrupt,
  ) -> (Result<Assignment, SolveFailure>, Statistics) {
    let (domains, pruned) = match self.arc_consistent_domains() {
      Ok(result) => result,
      Err(wipeout) => {
        debug!("{wipeout}, giving up before search");
        return (Err(SolveFailure::Unsatisfiable), Statistics::default());
      }
    };
    debug!(
      "Arc consistency pruned {pruned} words, {} candidates remain",
      domains.total_size()
    );

    let mut search = Search::new(
      &self.model,
      &self.overlaps,
      &self.vocabulary,
      &domains,
      interrupt,
    );
    let result = search.run();
    let stats = Statistics { pruned, ..search.into_stats() };
    debug!(
      "Search visited {} states with {} backtracks",
      stats.states, stats.backtracks
    );
    (result, stats)
  }

  /// Each assigned slot alongside its word, in slot order.
  pub fn entries<'a>(
    &'a self,
    assignment: &'a Assignment,
  ) -> impl Iterator<Item = (&'a Slot, &'a str)> + 'a {
    assignment
      .iter()
      .map(move |(slot, word)| (self.model.slot(slot), self.vocabulary.word(word)))
  }

  fn word_letter_positions<'a>(
    &'a self,
    slot: &'a Slot,
    word: WordId,
  ) -> impl Iterator<Item = (char, Pos)> + 'a {
    self.vocabulary.letters(word).iter().cloned().zip(slot.cells())
  }

  /// Lays the words of `assignment` out on the board. Cells not covered by
  /// an assigned slot are `None`.
  pub fn letter_grid(&self, assignment: &Assignment) -> XWordResult<Grid<Option<char>>> {
    let board = self.model.board();
    let mut answer_grid = Grid::new(board.width(), board.height());
    for (slot, word) in assignment.iter() {
      let slot = self.model.slot(slot);
      for (c, tile_pos) in self.word_letter_positions(slot, word) {
        let tile = answer_grid.get_mut(tile_pos).ok_or_else(|| {
          XWordError::Internal(format!("Position {tile_pos} is out of bounds"))
        })?;
        match tile {
          Some(existing_c) => {
            if c != *existing_c {
              return Err(
                XWordError::Internal(format!(
                  "Conflicting letter assignment at position {tile_pos}: {c} vs {existing_c}"
                ))
                .into(),
              );
            }
          }
          None => *tile = Some(c),
        }
      }
    }

    Ok(answer_grid)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use rand::{rngs::StdRng, Rng, SeedableRng};
  use util::{grid::Gridlike, pos::Pos};
  use xword_dict::WordList;

  use crate::{
    assignment::Assignment,
    search::{Interrupt, SolveFailure, Statistics},
    slot::SlotId,
    validate::Validator,
  };

  use super::XWord;

  fn xword(layout: &str, words: &[&str]) -> XWord {
    XWord::from_layout_with_words(layout, &WordList::from_words(words.iter().cloned())).unwrap()
  }

  fn words(xword: &XWord, assignment: &Assignment) -> Vec<String> {
    xword.entries(assignment).map(|(_, word)| word.to_owned()).collect()
  }

  fn assert_valid(xword: &XWord, assignment: &Assignment) {
    expect_true!(assignment.is_complete());
    expect_true!(Validator::new(&xword.overlaps, &xword.vocabulary).is_consistent(assignment));
    for (slot, word) in xword.entries(assignment) {
      expect_eq!(word.chars().count(), slot.length as usize);
    }
  }

  /// Whether any complete assignment exists, found by plain backtracking in
  /// slot order with no pruning or heuristics.
  fn brute_force_satisfiable(xword: &XWord) -> bool {
    fn extend(
      xword: &XWord,
      validator: &Validator,
      assignment: &mut Assignment,
      slot: SlotId,
    ) -> bool {
      if slot == assignment.slot_count() {
        return true;
      }
      for &word in xword.domains.domain(slot) {
        assignment.assign(slot, word);
        if validator.is_consistent(assignment) && extend(xword, validator, assignment, slot + 1) {
          return true;
        }
        assignment.unassign(slot);
      }
      false
    }

    let validator = Validator::new(&xword.overlaps, &xword.vocabulary);
    let mut assignment = Assignment::empty(xword.slots().len());
    extend(xword, &validator, &mut assignment, 0)
  }

  const TEE: &str = "___
                     #_#
                     #_#";

  #[gtest]
  fn test_empty() {
    expect_that!(XWord::from_layout(""), err(anything()));
  }

  #[gtest]
  fn test_no_fillable_cells() {
    expect_that!(XWord::from_layout("##\n##"), err(anything()));
  }

  #[gtest]
  fn test_available() {
    let xword = XWord::from_layout(
      "__
       X_",
    );

    assert_that!(xword, ok(anything()));
    let xword = xword.unwrap();
    expect_true!(xword.available(Pos { x: 0, y: 0 }));
    expect_true!(xword.available(Pos { x: 1, y: 0 }));
    expect_false!(xword.available(Pos { x: 0, y: 1 }));
    expect_true!(xword.available(Pos { x: 1, y: 1 }));
  }

  #[gtest]
  fn test_small_dict() {
    let xword = xword(
      "__
       X_",
      &["ab", "bc"],
    );
    let solution = xword.solve();
    assert_that!(solution, ok(anything()));
    let solution = xword.letter_grid(&solution.unwrap());
    assert_that!(solution, ok(anything()));
    let solution = solution.unwrap();
    expect_that!(
      solution.get(Pos { x: 0, y: 0 }).cloned().flatten(),
      some(eq('A'))
    );
    expect_that!(
      solution.get(Pos { x: 1, y: 0 }).cloned().flatten(),
      some(eq('B'))
    );
    expect_that!(solution.get(Pos { x: 0, y: 1 }).cloned().flatten(), none());
    expect_that!(
      solution.get(Pos { x: 1, y: 1 }).cloned().flatten(),
      some(eq('C'))
    );
  }

  #[gtest]
  fn test_middle_crossing_unsatisfiable() {
    // CAT, DOG and ACE have middle letters A, O and C. Two slots crossing
    // at their middles would need the same word twice.
    let xword = xword(
      "#_#
       ___
       #_#",
      &["cat", "dog", "ace"],
    );
    expect_that!(xword.solve().err(), some(eq(SolveFailure::Unsatisfiable)));
    expect_false!(brute_force_satisfiable(&xword));
  }

  #[gtest]
  fn test_tee_crossing() {
    let xword = xword(TEE, &["cat", "dog", "ace"]);
    let solution = xword.solve();
    assert_that!(solution, ok(anything()));
    let solution = solution.unwrap();
    assert_valid(&xword, &solution);
    expect_that!(words(&xword, &solution), container_eq(["ACE", "CAT"]));
  }

  #[gtest]
  fn test_missing_length() {
    let xword = xword(
      "____
       #_##
       #_##",
      &["cat", "dog", "ace"],
    );
    expect_true!(xword.domains().is_empty(0));
    expect_that!(xword.solve().err(), some(eq(SolveFailure::Unsatisfiable)));
  }

  #[gtest]
  fn test_no_vocabulary() {
    let xword = XWord::from_layout(TEE).unwrap();
    expect_that!(xword.solve().err(), some(eq(SolveFailure::Unsatisfiable)));
  }

  #[gtest]
  fn test_no_slots() {
    let xword = xword("_#\n#_", &["cat"]);
    expect_true!(xword.slots().is_empty());
    let solution = xword.solve();
    assert_that!(solution, ok(anything()));
    let grid = xword.letter_grid(&solution.unwrap()).unwrap();
    expect_true!(grid.iter().all(Option::is_none));
  }

  #[gtest]
  fn test_no_overlaps_distinct() {
    let xword = xword("___\n###\n___", &["cat", "dog"]);
    let solution = xword.solve();
    assert_that!(solution, ok(anything()));
    let solution = solution.unwrap();
    assert_valid(&xword, &solution);
    expect_that!(words(&xword, &solution), container_eq(["CAT", "DOG"]));
  }

  #[gtest]
  fn test_no_overlaps_one_word() {
    let xword = xword("___\n###\n___", &["cat"]);
    expect_that!(xword.solve().err(), some(eq(SolveFailure::Unsatisfiable)));
  }

  #[gtest]
  fn test_arc_consistent_domains() {
    let xword = xword(TEE, &["cat", "dog", "ace"]);
    let result = xword.arc_consistent_domains();
    assert_that!(result, ok(anything()));
    let (domains, pruned) = result.unwrap();
    expect_eq!(pruned, 2);
    expect_eq!(domains.len(0), 2);
    expect_eq!(xword.domains().len(0), 3);
  }

  #[gtest]
  fn test_neighbors() {
    let tee = xword(TEE, &["cat"]);
    expect_that!(tee.neighbors(0).to_vec(), container_eq([1]));
    expect_that!(tee.neighbors(1).to_vec(), container_eq([0]));

    // Reading order: top across, left down, right down, bottom across.
    let block = xword("__\n__", &["ab"]);
    expect_that!(block.neighbors(0).to_vec(), container_eq([1, 2]));
    expect_that!(block.neighbors(3).to_vec(), container_eq([1, 2]));

    let parallel = xword("___\n###\n___", &["cat"]);
    expect_true!(parallel.neighbors(0).is_empty());
  }

  #[gtest]
  fn test_solve_with_statistics() {
    let xword = xword(TEE, &["cat", "dog", "ace"]);
    let (result, stats) = xword.solve_with(&Interrupt::none());
    assert_that!(result, ok(anything()));
    // ACE goes across first, then ACE down clashes with it before CAT fits.
    expect_true!(stats == Statistics { pruned: 2, states: 3, backtracks: 1 });
  }

  #[gtest]
  fn test_solve_with_wipeout() {
    let xword = xword(TEE, &["abc", "def"]);
    let (result, stats) = xword.solve_with(&Interrupt::none());
    expect_that!(result.err(), some(eq(SolveFailure::Unsatisfiable)));
    expect_true!(stats == Statistics::default());
  }

  // Rows ABC/DEF/GHI and columns ADG/BEH/CFI, or the same square
  // transposed. ABD and XYZ are decoys.
  const SQUARE_WORDS: [&str; 8] = ["abc", "def", "ghi", "adg", "beh", "cfi", "abd", "xyz"];

  #[gtest]
  fn test_full_square() {
    let xword = xword(
      "___
       ___
       ___",
      &SQUARE_WORDS,
    );
    let solution = xword.solve();
    assert_that!(solution, ok(anything()));
    let solution = solution.unwrap();
    assert_valid(&xword, &solution);
    let grid = xword.letter_grid(&solution).unwrap();
    expect_that!(grid.get(Pos { x: 1, y: 1 }).cloned().flatten(), some(eq('E')));
  }

  #[gtest]
  fn test_deterministic() {
    let layout = "___\n___\n___";
    let first = xword(layout, &SQUARE_WORDS).solve();
    assert_that!(first, ok(anything()));
    for _ in 0..5 {
      expect_true!(xword(layout, &SQUARE_WORDS).solve() == first);
    }
  }

  #[gtest]
  fn test_letter_grid_conflict() {
    let xword = xword(TEE, &["cat", "dog"]);
    let mut assignment = Assignment::empty(2);
    assignment.assign(0, xword.vocabulary().find("CAT").unwrap());
    assignment.assign(1, xword.vocabulary().find("DOG").unwrap());
    expect_that!(xword.letter_grid(&assignment), err(anything()));
  }

  #[gtest]
  fn test_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let alphabet = ['A', 'B', 'C'];

    for _ in 0..100 {
      let width = rng.random_range(2..=4);
      let height = rng.random_range(2..=4);
      let layout = (0..height)
        .map(|_| {
          (0..width)
            .map(|_| if rng.random_bool(0.8) { '_' } else { '#' })
            .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n");
      let words: Vec<String> = (0..rng.random_range(4..=20))
        .map(|_| {
          let length = rng.random_range(2..=4);
          (0..length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect()
        })
        .collect();

      let Ok(mut xword) = XWord::from_layout(&layout) else {
        continue;
      };
      xword.load_vocabulary(&WordList::from_words(words.iter().map(String::as_str)));

      let satisfiable = brute_force_satisfiable(&xword);
      match xword.solve() {
        Ok(solution) => {
          expect_true!(satisfiable);
          assert_valid(&xword, &solution);
          expect_true!(xword.solve() == Ok(solution));
        }
        Err(failure) => {
          expect_eq!(failure, SolveFailure::Unsatisfiable);
          expect_false!(satisfiable);
        }
      }
    }
  }

  #[gtest]
  fn test_render_width() {
    let xword = xword(TEE, &["cat", "ace"]);
    let grid = xword.letter_grid(&xword.solve().unwrap()).unwrap();
    expect_eq!(grid.width(), 3);
    expect_that!(
      grid.iter_row(0).cloned().collect::<Vec<_>>(),
      container_eq([Some('A'), Some('C'), Some('E')])
    );
  }
}
