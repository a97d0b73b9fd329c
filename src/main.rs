#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod render;

use std::{fs, path::Path, time::Duration};

use ab_glyph::FontVec;
use args::{Args, OutputFormat};
use clap::Parser;
use env_logger::Env;
use image::ImageFormat;
use log::{debug, info, warn};
use render::Tile;
use util::{
  bitcode,
  error::{XWordError, XWordResult},
  grid::Grid,
  time::time_fn,
};
use xword_dict::WordList;
use xword_gen::{
  search::{Interrupt, SolveFailure},
  xword::XWord,
};

fn load_font(path: &Path) -> XWordResult<FontVec> {
  let bytes = fs::read(path).map_err(|err| {
    XWordError::Config(format!("Could not read font {}: {err}", path.display()))
  })?;
  Ok(FontVec::try_from_vec(bytes)?)
}

fn save_solution(
  args: &Args,
  path: &Path,
  letters: &Grid<Option<char>>,
  tiles: &Grid<Tile>,
) -> XWordResult {
  match args.output_format() {
    OutputFormat::Bin => fs::write(path, bitcode::encode(letters))?,
    OutputFormat::Text => fs::write(path, render::render_text(tiles))?,
    OutputFormat::Png => {
      let font = load_font(&args.font)?;
      render::render_image(tiles, Some(&font)).save_with_format(path, ImageFormat::Png)?
    }
  }
  info!("Saved solution to {}", path.display());
  Ok(())
}

fn main() -> XWordResult {
  let args = Args::parse();
  env_logger::Builder::from_env(
    Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
  )
  .init();

  let mut xword = XWord::from_layout(&fs::read_to_string(&args.structure)?)?;
  xword.load_vocabulary(&WordList::read_from_file(&args.words)?);

  let interrupt = match args.timeout_secs {
    Some(secs) => Interrupt::none().with_timeout(Duration::from_secs(secs)),
    None => Interrupt::none(),
  };
  let (time, (result, stats)) = time_fn(|| xword.solve_with(&interrupt));
  info!(
    "Took {}s: {} states, {} backtracks, {} words pruned",
    time.as_secs_f32(),
    stats.states,
    stats.backtracks,
    stats.pruned
  );

  let assignment = match result {
    Ok(assignment) => assignment,
    Err(failure) => {
      if failure == SolveFailure::Cancelled {
        warn!("Gave up after {}s", time.as_secs_f32());
      }
      println!("No solution.");
      return Ok(());
    }
  };

  for (slot, word) in xword.entries(&assignment) {
    debug!("{slot}: {word}");
  }

  let letters = xword.letter_grid(&assignment)?;
  let tiles = render::tiles(xword.board(), &letters)?;
  print!("{}", render::render_text(&tiles));

  if let Some(output) = &args.output {
    save_solution(&args, output, &letters, &tiles)?;
  }

  Ok(())
}
