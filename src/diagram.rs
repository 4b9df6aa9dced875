//! Plain-text board diagrams.
//!
//! One row per line, top row first. Black is `X`, `B` or `#`; white is
//! `O`, `W` or `@`; empty is `.`, `+` or `-`. Whitespace inside a row and
//! blank lines are ignored.

use crate::color::{Color, EMPTY};
use crate::error::{EstimateError, Result};
use crate::goban::Goban;
use crate::grid::Grid;

fn cell_value(c: char) -> Option<i32> {
    match c {
        'X' | 'x' | 'B' | 'b' | '#' => Some(Color::Black.value()),
        'O' | 'o' | 'W' | 'w' | '@' => Some(Color::White.value()),
        '.' | '+' | '-' => Some(EMPTY),
        _ => None,
    }
}

/// Parses a diagram into its width, height and row-major cells.
pub fn parse_cells(text: &str) -> Result<(usize, usize, Vec<i32>)> {
    let mut width = None;
    let mut height = 0;
    let mut cells = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let row: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
        if row.is_empty() {
            continue;
        }
        for &c in &row {
            let value = cell_value(c).ok_or_else(|| {
                EstimateError::InvalidInput(format!(
                    "unknown character {c:?} on line {}",
                    line_no + 1
                ))
            })?;
            cells.push(value);
        }
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(EstimateError::InvalidInput(format!(
                    "line {} has {} points, expected {w}",
                    line_no + 1,
                    row.len()
                )));
            }
            Some(_) => {}
        }
        height += 1;
    }

    let width = width.ok_or_else(|| EstimateError::InvalidInput("empty diagram".into()))?;
    Ok((width, height, cells))
}

/// Parses a diagram into a board.
pub fn parse(text: &str) -> Result<Goban> {
    let (width, height, cells) = parse_cells(text)?;
    Goban::from_cells(width, height, &cells)
}

/// Renders an ownership grid: `X` black, `O` white, `.` neutral.
pub fn render(ownership: &Grid) -> String {
    let mut out = String::with_capacity((ownership.width() + 1) * ownership.height());
    for p in ownership.points() {
        out.push(match Color::from_value(ownership[p]) {
            Some(Color::Black) => 'X',
            Some(Color::White) => 'O',
            None => '.',
        });
        if p.x + 1 == ownership.width() {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn parses_all_spellings() {
        let (w, h, cells) = parse_cells("X B #\nO W @\n. + -\n").unwrap();
        assert_eq!((w, h), (3, 3));
        assert_eq!(cells, vec![1, 1, 1, -1, -1, -1, 0, 0, 0]);
    }

    #[test]
    fn skips_blank_lines() {
        let g = parse("\n  X.\n\n  .O\n\n").unwrap();
        assert_eq!((g.width(), g.height()), (2, 2));
        assert_eq!(g.board()[Point::new(1, 1)], -1);
    }

    #[test]
    fn rejects_bad_diagrams() {
        assert!(matches!(parse("X.\nX"), Err(EstimateError::InvalidInput(_))));
        assert!(matches!(parse("X?"), Err(EstimateError::InvalidInput(_))));
        assert!(matches!(parse("  \n"), Err(EstimateError::InvalidInput(_))));
        let too_wide = ".".repeat(26);
        assert!(matches!(parse(&too_wide), Err(EstimateError::Capacity { .. })));
    }

    #[test]
    fn renders_ownership() {
        let grid = Grid::from_cells(3, 2, vec![1, 0, -1, -1, -1, 0]).unwrap();
        assert_eq!(render(&grid), "X.O\nOO.\n");
    }
}
