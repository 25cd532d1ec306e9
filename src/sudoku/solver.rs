use crate::sat::assignment::Environment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Formula;
use crate::sat::literal::Literal;
use crate::sat::variable::Variable;
use crate::sudoku::error::SudokuError;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};

/// Cells of one row, column or block. Large enough for a 25x25 grid without
/// spilling to the heap.
type Group = SmallVec<[(usize, usize); 25]>;

/// A square grid of digits, `0` for a blank. Indexed `[row][col]` from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    /// Wraps rows of digits as given. Shape is checked by [`Sudoku::new`].
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// A board of blanks.
    #[must_use]
    pub fn empty(size: Size) -> Self {
        let n = usize::from(size);
        Self(vec![vec![0; n]; n])
    }

    /// The digit at 0-based (`row`, `col`).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.0[row][col]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl From<&Board> for Vec<Vec<usize>> {
    fn from(board: &Board) -> Self {
        board.0.clone()
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Board {
    fn from(board: [[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl<const N: usize> From<&[[usize; N]; N]> for Board {
    fn from(board: &[[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

/// A 4x4 puzzle with a unique solution.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[1, 0, 0, 4], [0, 4, 1, 0], [0, 1, 4, 0], [4, 0, 0, 1]];

/// A classic 9x9 puzzle, solvable by propagation alone.
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// Side length of a supported grid.
#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord, Hash)]
pub enum Size {
    /// 4x4 with 2x2 blocks.
    Four = 4,
    /// 9x9 with 3x3 blocks.
    Nine = 9,
    /// 16x16 with 4x4 blocks.
    Sixteen = 16,
    /// 25x25 with 5x5 blocks.
    TwentyFive = 25,
}

impl TryFrom<usize> for Size {
    type Error = SudokuError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            _ => Err(SudokuError::InvalidSize(value)),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        match size {
            Size::Four => 4,
            Size::Nine => 9,
            Size::Sixteen => 16,
            Size::TwentyFive => 25,
        }
    }
}

impl Size {
    /// Side length of one block.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }
}

/// "Digit `num` sits at (`row`, `col`)", with all three counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDigit {
    /// Row, from 1.
    pub row: usize,
    /// Column, from 1.
    pub col: usize,
    /// Digit, from 1.
    pub num: usize,
}

impl CellDigit {
    /// The proposition for `num` at (`row`, `col`).
    #[must_use]
    pub const fn new(row: usize, col: usize, num: usize) -> Self {
        Self { row, col, num }
    }

    /// Unique for every triple at every grid size, since the separators keep
    /// `(1, 11, 1)` and `(11, 1, 1)` apart.
    #[must_use]
    pub fn name(&self) -> String {
        format!("v{}_{}_{}", self.row, self.col, self.num)
    }

    /// The interned variable for this proposition.
    #[must_use]
    pub fn variable(&self) -> Variable {
        Variable::new(&self.name())
    }

    /// The proposition asserted true.
    #[must_use]
    pub fn literal(&self) -> Literal {
        Literal::positive(self.variable())
    }
}

/// The variable meaning "digit `num` sits at (`row`, `col`)", 1-based.
#[must_use]
pub fn cell_variable(row: usize, col: usize, num: usize) -> Variable {
    CellDigit::new(row, col, num).variable()
}

/// Renders a digit as a single character: `1`-`9`, then `A` for 10 onwards.
#[must_use]
pub fn digit_char(num: usize) -> char {
    match num {
        0 => '.',
        1..=9 => char::from_digit(u32::try_from(num).unwrap_or(0), 10).unwrap_or('?'),
        _ => u8::try_from(num - 10)
            .ok()
            .and_then(|offset| b'A'.checked_add(offset))
            .map_or('?', char::from),
    }
}

/// Inverse of [`digit_char`]. Letters `A` to `P` stand for 10 to 25 and are
/// accepted in either case.
#[must_use]
pub fn char_digit(c: char) -> Option<usize> {
    match c {
        '.' | '0' => Some(0),
        '1'..='9' => c.to_digit(10).map(|d| d as usize),
        'A'..='P' => Some(c as usize - 'A' as usize + 10),
        'a'..='p' => Some(c as usize - 'a' as usize + 10),
        _ => None,
    }
}

/// A (possibly partial) Sudoku puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    /// The digits, `0` for blanks.
    pub board: Board,
    /// Side length.
    pub size: Size,
}

/// At least one of `literals` holds.
fn at_least_one(literals: impl IntoIterator<Item = Literal>) -> Clause {
    literals.into_iter().collect()
}

/// No two of `literals` hold together: one `(~a | ~b)` per pair.
fn at_most_one(literals: &[Literal]) -> impl Iterator<Item = Clause> + '_ {
    literals
        .iter()
        .tuple_combinations()
        .map(|(a, b)| Clause::from(vec![!a, !b]))
}

impl Sudoku {
    /// Wraps `board`, checking its shape and values.
    ///
    /// # Errors
    ///
    /// If the board is not square with a supported side length, or holds a
    /// value greater than its side length.
    pub fn new(board: Board) -> Result<Self, SudokuError> {
        let size = Size::try_from(board.0.len())?;
        let n = usize::from(size);

        for (r, row) in board.0.iter().enumerate() {
            if row.len() != n {
                return Err(SudokuError::RowLength {
                    row: r + 1,
                    found: row.len(),
                    expected: n,
                });
            }
            if let Some((c, &value)) = row.iter().find_position(|&&value| value > n) {
                return Err(SudokuError::ValueOutOfRange {
                    row: r + 1,
                    col: c + 1,
                    value,
                    size: n,
                });
            }
        }

        Ok(Self { board, size })
    }

    /// A puzzle with no clues.
    #[must_use]
    pub fn empty(size: Size) -> Self {
        Self {
            board: Board::empty(size),
            size,
        }
    }

    /// Side length.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.size)
    }

    /// Every row, every column and every block, each as a list of 1-based
    /// cell coordinates.
    fn groups(&self) -> Vec<Group> {
        let n = self.len();
        let block = self.size.block_size();

        let rows = (1..=n).map(|row| (1..=n).map(|col| (row, col)).collect::<Group>());
        let cols = (1..=n).map(|col| (1..=n).map(|row| (row, col)).collect::<Group>());
        let blocks = (0..n).step_by(block).cartesian_product((0..n).step_by(block)).map(
            |(top, left)| {
                (top + 1..=top + block)
                    .cartesian_product(left + 1..=left + block)
                    .collect::<Group>()
            },
        );

        rows.chain(cols).chain(blocks).collect()
    }

    /// The filled cells of the board.
    pub fn clues(&self) -> impl Iterator<Item = CellDigit> + '_ {
        self.board.rows().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &num)| num != 0)
                .map(move |(c, &num)| CellDigit::new(r + 1, c + 1, num))
        })
    }

    /// Each cell holds exactly one digit.
    fn cell_clauses(&self) -> Vec<Clause> {
        let n = self.len();
        let mut clauses = Vec::new();
        for (row, col) in (1..=n).cartesian_product(1..=n) {
            let digits: SmallVec<[Literal; 25]> = (1..=n)
                .map(|num| CellDigit::new(row, col, num).literal())
                .collect();
            clauses.push(at_least_one(digits.iter().copied()));
            clauses.extend(at_most_one(&digits));
        }
        clauses
    }

    /// Each digit appears exactly once in every row, column and block.
    fn group_clauses(&self) -> Vec<Clause> {
        let n = self.len();
        let mut clauses = Vec::new();
        for group in self.groups() {
            for num in 1..=n {
                let cells: SmallVec<[Literal; 25]> = group
                    .iter()
                    .map(|&(row, col)| CellDigit::new(row, col, num).literal())
                    .collect();
                clauses.push(at_least_one(cells.iter().copied()));
                clauses.extend(at_most_one(&cells));
            }
        }
        clauses
    }

    /// Encodes the puzzle as a CNF formula over the variables
    /// [`cell_variable`]`(row, col, num)`.
    ///
    /// The clues come first, so the solver starts by propagating them.
    #[must_use]
    pub fn to_formula(&self) -> Formula {
        self.to_formula_with(&[])
    }

    /// Like [`Sudoku::to_formula`], with `extra` asserted as clues on top of
    /// the board's own. A board holds one digit per cell, so this is how two
    /// clues for the same cell are stated.
    #[must_use]
    pub fn to_formula_with(&self, extra: &[CellDigit]) -> Formula {
        let clues: Formula = self
            .clues()
            .chain(extra.iter().copied())
            .map(|clue| Clause::singleton(clue.literal()))
            .collect();

        self.cell_clauses()
            .into_iter()
            .chain(self.group_clauses())
            .fold(Formula::new(), |formula, clause| formula.add_clause(clause))
            .and(&clues)
    }

    /// Reads a model of [`Sudoku::to_formula`] back into a filled grid.
    ///
    /// Variables the model leaves unassigned count as "digit not placed".
    ///
    /// # Errors
    ///
    /// If some cell gets no digit or more than one.
    pub fn decode(&self, env: &Environment) -> Result<Self, SudokuError> {
        let n = self.len();
        let values = env.to_map();
        let mut board = vec![vec![0; n]; n];

        for (row, col) in (1..=n).cartesian_product(1..=n) {
            let mut placed = (1..=n).filter(|&num| {
                values
                    .get(&cell_variable(row, col, num))
                    .copied()
                    .unwrap_or(false)
            });
            let num = placed.next().ok_or(SudokuError::EmptyCell { row, col })?;
            if placed.next().is_some() {
                return Err(SudokuError::MultipleValues { row, col });
            }
            board[row - 1][col - 1] = num;
        }

        Ok(Self {
            board: Board::new(board),
            size: self.size,
        })
    }

    /// Whether every cell is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.board.rows().flatten().all(|&num| num != 0)
    }

    /// Whether the grid is complete and every row, column and block holds
    /// each digit exactly once.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let n = self.len();
        self.is_complete()
            && self.groups().iter().all(|group| {
                group
                    .iter()
                    .map(|&(row, col)| self.board.get(row - 1, col - 1))
                    .unique()
                    .count()
                    == n
            })
    }

    /// Whether every clue of `self` appears unchanged in `other`.
    #[must_use]
    pub fn agrees_with(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .board
                .rows()
                .zip(other.board.rows())
                .all(|(mine, theirs)| {
                    mine.iter()
                        .zip(theirs)
                        .all(|(&a, &b)| a == 0 || a == b)
                })
    }

    /// Rows from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.board.rows()
    }
}

impl TryFrom<Board> for Sudoku {
    type Error = SudokuError;

    fn try_from(board: Board) -> Result<Self, Self::Error> {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

/// One row per line, `.` for blanks, e.g. for a 4x4 grid:
///
/// ```text
/// 12.4
/// 3412
/// 2.43
/// 4321
/// ```
impl Display for Sudoku {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.board.rows() {
            let line: String = row.iter().map(|&num| digit_char(num)).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
