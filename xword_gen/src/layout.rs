use util::{
  error::{XWordError, XWordResult},
  grid::Grid,
};

/// Parses a grid definition. Each line is a row; `_` marks a fillable cell
/// and `#` or `X` a blocked one. Whitespace around each row is ignored, as
/// are blank lines before and after the grid.
pub fn parse_layout(layout: &str) -> XWordResult<Grid<bool>> {
  let rows = layout
    .trim()
    .lines()
    .enumerate()
    .map(|(y, line)| {
      line
        .trim()
        .chars()
        .enumerate()
        .map(|(x, c)| match c {
          '_' => Ok(true),
          '#' | 'X' => Ok(false),
          _ => Err(
            XWordError::Parse(format!("Unrecognized board character '{c}' at ({x}, {y})")).into(),
          ),
        })
        .collect::<XWordResult<Vec<_>>>()
    })
    .collect::<XWordResult<Vec<_>>>()?;

  if rows.iter().all(|row| row.is_empty()) {
    return Err(XWordError::Parse("Empty board string".to_owned()).into());
  }

  Grid::from_rows(rows)
}
