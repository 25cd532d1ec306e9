#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading puzzles from text.
//!
//! A puzzle is one line per row:
//! - Rows may be written as a run of characters (`53..7....`) or as
//!   whitespace-separated numbers (`5 3 0 0 7 0 0 0 0`). Numbers are needed
//!   for values of 10 and up unless letters are used (`A` = 10, `B` = 11, ...).
//! - `.` and `0` mark a blank cell.
//! - Blank lines and lines starting with `#` are skipped.
//!
//! The side length is the number of rows and must be 4, 9, 16 or 25. Letters
//! beyond the side length (`E` in a 4x4 grid, say) are invalid characters.
//!
//! A grid may also carry an index frame: one extra leading row and one extra
//! leading entry per row, `n + 1` entries across `n + 1` rows. The frame is
//! dropped unread.

use crate::sudoku::error::SudokuError;
use crate::sudoku::solver::{Board, Size, Sudoku, char_digit};
use std::io::{self, BufRead};
use std::path::Path;

/// Splits a row into entries: whitespace-separated tokens when the row has
/// whitespace, single characters otherwise.
fn split_row(line: &str) -> Vec<String> {
    if line.contains(char::is_whitespace) {
        line.split_whitespace().map(str::to_string).collect()
    } else {
        line.chars().map(String::from).collect()
    }
}

/// Whether `rows` are an `n x n` grid wrapped in an index row and column.
/// No supported size is one more than another, so this never misreads a
/// plain grid.
fn has_index_frame(rows: &[Vec<String>]) -> bool {
    let m = rows.len();
    m > 1 && Size::try_from(m - 1).is_ok() && rows.iter().all(|row| row.len() == m)
}

/// Reads one entry of an `n`-wide grid. Position is 1-based and only used for
/// error reporting.
fn parse_entry(token: &str, row: usize, col: usize, n: usize) -> Result<usize, SudokuError> {
    let letter = |ch: char| char_digit(ch).filter(|&value| value <= n);

    let value = if let Ok(number) = token.parse::<usize>() {
        Some(number)
    } else {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphabetic() => letter(ch),
            (Some(ch), None) => char_digit(ch),
            _ => None,
        }
    };

    value.ok_or_else(|| SudokuError::InvalidCharacter {
        row,
        col,
        found: token.to_string(),
    })
}

/// Parses a puzzle from a `BufRead` source.
///
/// # Errors
///
/// If reading fails, an entry is not a digit, or the grid is not a
/// supported square.
pub fn parse_sudoku_reader<R: BufRead>(reader: R) -> Result<Sudoku, SudokuError> {
    let mut rows = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        rows.push(split_row(line));
    }

    if has_index_frame(&rows) {
        rows.remove(0);
        for row in &mut rows {
            row.remove(0);
        }
    }

    let n = rows.len();
    let board = rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, token)| parse_entry(token, r + 1, c + 1, n))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Sudoku::new(Board::new(board))
}

/// Parses a puzzle from a string.
///
/// # Errors
///
/// See [`parse_sudoku_reader`].
pub fn parse_sudoku(input: &str) -> Result<Sudoku, SudokuError> {
    parse_sudoku_reader(input.as_bytes())
}

/// Parses a puzzle file.
///
/// # Errors
///
/// If the file cannot be opened or read, or its content is malformed.
pub fn parse_sudoku_file<P: AsRef<Path>>(file_path: P) -> Result<Sudoku, SudokuError> {
    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    parse_sudoku_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::solver::{EXAMPLE_FOUR, EXAMPLE_NINE};

    #[test]
    fn test_parse_compact_rows() {
        let sudoku = parse_sudoku("1..4\n.41.\n.14.\n4..1\n").unwrap();
        assert_eq!(sudoku.size, Size::Four);
        assert_eq!(sudoku.board, Board::from(EXAMPLE_FOUR));
    }

    #[test]
    fn test_parse_spaced_rows_with_comments() {
        let input = "# a classic\n\n\
            5 3 0 0 7 0 0 0 0\n6 0 0 1 9 5 0 0 0\n0 9 8 0 0 0 0 6 0\n\
            8 0 0 0 6 0 0 0 3\n4 0 0 8 0 3 0 0 1\n7 0 0 0 2 0 0 0 6\n\
            0 6 0 0 0 0 2 8 0\n0 0 0 4 1 9 0 0 5\n0 0 0 0 8 0 0 7 9\n";
        let sudoku = parse_sudoku(input).unwrap();
        assert_eq!(sudoku.size, Size::Nine);
        assert_eq!(sudoku.board, Board::from(EXAMPLE_NINE));
    }

    #[test]
    fn test_display_parses_back() {
        let sudoku = parse_sudoku(&Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap().to_string())
            .unwrap();
        assert_eq!(sudoku.board, Board::from(EXAMPLE_NINE));
    }

    #[test]
    fn test_parse_large_values() {
        let mut rows = vec![vec![0; 16]; 16];
        rows[0][0] = 16;
        rows[1][2] = 10;
        let text: String = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
                    + "\n"
            })
            .collect();
        let sudoku = parse_sudoku(&text).unwrap();
        assert_eq!(sudoku.size, Size::Sixteen);
        assert_eq!(sudoku.board.get(0, 0), 16);

        let lettered = parse_sudoku(&sudoku.to_string()).unwrap();
        assert_eq!(lettered.board.get(1, 2), 10);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_sudoku("1..4\n.4x.\n.14.\n4..1\n"),
            Err(SudokuError::InvalidCharacter { row: 2, col: 3, .. })
        ));
        assert!(matches!(
            parse_sudoku("1..\n.41\n.14\n"),
            Err(SudokuError::InvalidSize(3))
        ));
        assert!(matches!(
            parse_sudoku("1..4\n.41\n.14.\n4..1\n"),
            Err(SudokuError::RowLength { row: 2, found: 3, expected: 4 })
        ));
        assert!(matches!(
            parse_sudoku("1..9\n....\n....\n....\n"),
            Err(SudokuError::ValueOutOfRange { value: 9, .. })
        ));
    }

    #[test]
    fn test_letters_beyond_grid_size_are_invalid() {
        assert!(matches!(
            parse_sudoku("1..4\n.4A.\n.14.\n4..1\n"),
            Err(SudokuError::InvalidCharacter { row: 2, col: 3, .. })
        ));

        let mut rows = vec![".".repeat(16); 16];
        rows[0] = format!("Q{}", ".".repeat(15));
        assert!(matches!(
            parse_sudoku(&rows.join("\n")),
            Err(SudokuError::InvalidCharacter { row: 1, col: 1, .. })
        ));

        rows[0] = format!("g{}", ".".repeat(15));
        assert_eq!(parse_sudoku(&rows.join("\n")).unwrap().board.get(0, 0), 16);
    }

    #[test]
    fn test_parse_skips_index_frame() {
        let framed = "01234\n11..4\n2.41.\n3.14.\n44..1\n";
        let sudoku = parse_sudoku(framed).unwrap();
        assert_eq!(sudoku.size, Size::Four);
        assert_eq!(sudoku.board, Board::from(EXAMPLE_FOUR));

        let spaced = "0 1 2 3 4\n1 1 0 0 4\n2 0 4 1 0\n3 0 1 4 0\n4 4 0 0 1\n";
        assert_eq!(parse_sudoku(spaced).unwrap().board, Board::from(EXAMPLE_FOUR));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_sudoku_file("/nonexistent/puzzle.sudoku"),
            Err(SudokuError::Io(_))
        ));
    }
}
