use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
  /// The rendered grid, as printed to the terminal.
  Text,
  /// The letter grid encoded with bitcode.
  Bin,
  /// A picture of the filled grid.
  Png,
}

#[derive(Parser, Debug)]
#[command(version, about = "Fill a crossword grid from a word list", long_about = None)]
pub struct Args {
  /// Grid definition, one row per line: `_` is a fillable cell, `#` or `X`
  /// a blocked one.
  pub structure: PathBuf,

  /// Word list, one word per line.
  pub words: PathBuf,

  /// Where to save the filled grid.
  pub output: Option<PathBuf>,

  /// Format of the saved grid. Defaults to `bin` for a `.bin` output path,
  /// `png` for a `.png` one and `text` otherwise.
  #[arg(long)]
  pub format: Option<OutputFormat>,

  /// TrueType font for the letters of a `png` output.
  #[arg(long, default_value = "assets/fonts/OpenSans-Regular.ttf")]
  pub font: PathBuf,

  /// Give up on the search after this many seconds.
  #[arg(long)]
  pub timeout_secs: Option<u64>,

  #[arg(long, short)]
  pub verbose: bool,
}

impl Args {
  pub fn output_format(&self) -> OutputFormat {
    self.format.unwrap_or_else(|| {
      match self.output.as_ref().and_then(|path| path.extension()) {
        Some(ext) if ext == "bin" => OutputFormat::Bin,
        Some(ext) if ext == "png" => OutputFormat::Png,
        _ => OutputFormat::Text,
      }
    })
  }
}
