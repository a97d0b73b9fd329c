use std::fmt::Display;

use ab_glyph::{Font, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::{
  drawing::{draw_filled_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use itertools::Itertools;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
  Letter(char),
  Empty,
  Wall,
}

impl Display for Tile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Tile::Letter(c) => *c,
        Tile::Empty => ' ',
        Tile::Wall => '█',
      }
    )
  }
}

pub fn tiles(board: &Grid<bool>, letters: &Grid<Option<char>>) -> XWordResult<Grid<Tile>> {
  if board.width() != letters.width() || board.height() != letters.height() {
    return Err(
      XWordError::Internal(format!(
        "Letter grid is {}x{}, board is {}x{}",
        letters.width(),
        letters.height(),
        board.width(),
        board.height()
      ))
      .into(),
    );
  }

  Grid::from_vec(
    board
      .iter()
      .zip(letters.iter())
      .map(|(&available, &letter)| match (available, letter) {
        (false, _) => Tile::Wall,
        (true, Some(c)) => Tile::Letter(c),
        (true, None) => Tile::Empty,
      })
      .collect(),
    board.width(),
    board.height(),
  )
}

/// One line per row, each ending in a newline.
pub fn render_text(tiles: &Grid<Tile>) -> String {
  (0..tiles.height())
    .map(|y| tiles.iter_row(y).join("") + "\n")
    .collect()
}

pub const CELL_SIZE: u32 = 100;
const CELL_BORDER: u32 = 2;
const LETTER_SCALE: f32 = 80.0;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Draws the grid on a black canvas, `CELL_SIZE` pixels per cell. Fillable
/// cells are white squares inset by a thin border, with their letter
/// centered in black. Letters are only drawn when a font is given.
pub fn render_image<F: Font>(tiles: &Grid<Tile>, font: Option<&F>) -> RgbaImage {
  let mut image =
    RgbaImage::from_pixel(tiles.width() * CELL_SIZE, tiles.height() * CELL_SIZE, BLACK);
  let interior = CELL_SIZE - 2 * CELL_BORDER;
  let scale = PxScale::from(LETTER_SCALE);

  for pos in tiles.positions() {
    let Some(&tile) = tiles.get(pos) else {
      continue;
    };
    if tile == Tile::Wall {
      continue;
    }

    let left = pos.x * CELL_SIZE as i32 + CELL_BORDER as i32;
    let top = pos.y * CELL_SIZE as i32 + CELL_BORDER as i32;
    draw_filled_rect_mut(&mut image, Rect::at(left, top).of_size(interior, interior), WHITE);

    if let (Tile::Letter(c), Some(font)) = (tile, font) {
      let letter = c.to_string();
      let (width, height) = text_size(scale, font, &letter);
      draw_text_mut(
        &mut image,
        BLACK,
        left + (interior as i32 - width as i32) / 2,
        top + (interior as i32 - height as i32) / 2,
        scale,
        font,
        &letter,
      );
    }
  }

  image
}
