use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{MoveError, ParseBoardError};
use crate::types::{BOARD_SIZE, Cell, Color, NUM_SQUARES, Position, Winner};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Legal moves for one side, each mapped to the discs it would flip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoveSet {
    moves: BTreeMap<Position, Vec<Position>>,
}

impl LegalMoveSet {
    /// Capture set for `pos`, or `None` when `pos` is not a legal move.
    pub fn get(&self, pos: Position) -> Option<&[Position]> {
        self.moves.get(&pos).map(Vec::as_slice)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.moves.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Legal coordinates in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        self.moves.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Position])> {
        self.moves.iter().map(|(pos, flips)| (*pos, flips.as_slice()))
    }
}

/// Othello board: an 8x8 row-major grid plus disc counts derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    black_count: u8,
    white_count: u8,
}

impl Board {
    /// Creates the initial board:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        cells[3][3] = Cell::Disc(Color::White);
        cells[4][4] = Cell::Disc(Color::White);
        cells[3][4] = Cell::Disc(Color::Black);
        cells[4][3] = Cell::Disc(Color::Black);
        Self::from_cells(cells)
    }

    /// Builds a board from an arbitrary grid.
    pub fn from_cells(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self {
            cells,
            black_count: 0,
            white_count: 0,
        };
        board.recount();
        board
    }

    /// Returns `None` when `pos` is off the board.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells
            .get(pos.row as usize)?
            .get(pos.col as usize)
            .copied()
    }

    /// Returns `None` when `(row, col)` is off the board.
    pub fn cell_at(&self, row: u8, col: u8) -> Option<Cell> {
        self.cell(Position { row, col })
    }

    /// Returns every legal move for `color` with its capture set.
    /// Recomputed from the grid on each call.
    pub fn legal_moves(&self, color: Color) -> LegalMoveSet {
        let mut moves = BTreeMap::new();

        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                let pos = Position { row, col };
                if !self.square(pos).is_empty() {
                    continue;
                }
                let flips = self.collect_flips(pos, color);
                if !flips.is_empty() {
                    moves.insert(pos, flips);
                }
            }
        }

        LegalMoveSet { moves }
    }

    /// Places a `color` disc at `pos` and flips its captures.
    /// Returns the flipped positions; on error the board is untouched.
    pub fn apply_move(&mut self, pos: Position, color: Color) -> Result<Vec<Position>, MoveError> {
        let legal = self.legal_moves(color);
        let flips = legal.get(pos).ok_or(MoveError::IllegalMove {
            row: pos.row,
            col: pos.col,
        })?;

        let mut next = self.cells;
        next[pos.row as usize][pos.col as usize] = Cell::Disc(color);
        for flip in flips {
            next[flip.row as usize][flip.col as usize] = Cell::Disc(color);
        }

        *self = Self::from_cells(next);
        Ok(flips.to_vec())
    }

    /// Returns `(black_count, white_count)`.
    pub fn counts(&self) -> (u8, u8) {
        (self.black_count, self.white_count)
    }

    pub fn count(&self, color: Color) -> u8 {
        match color {
            Color::Black => self.black_count,
            Color::White => self.white_count,
        }
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.black_count - self.white_count
    }

    /// Strict count comparison; equal counts is a draw.
    pub fn winner(&self) -> Winner {
        if self.black_count > self.white_count {
            Winner::Black
        } else if self.white_count > self.black_count {
            Winner::White
        } else {
            Winner::Draw
        }
    }

    /// True when neither side has a legal move right now.
    pub fn is_terminal(&self) -> bool {
        self.legal_moves(Color::Black).is_empty() && self.legal_moves(Color::White).is_empty()
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in self.cells.iter().flatten().enumerate() {
            board[idx] = cell.to_u8();
        }
        board
    }

    // Callers guarantee `pos` is on the board.
    fn square(&self, pos: Position) -> Cell {
        self.cells[pos.row as usize][pos.col as usize]
    }

    fn recount(&mut self) {
        let (mut black, mut white) = (0u8, 0u8);
        for cell in self.cells.iter().flatten() {
            match cell {
                Cell::Disc(Color::Black) => black += 1,
                Cell::Disc(Color::White) => white += 1,
                Cell::Empty => {}
            }
        }
        self.black_count = black;
        self.white_count = white;
    }

    fn collect_flips(&self, pos: Position, color: Color) -> Vec<Position> {
        let opp = Cell::Disc(color.opponent());
        let me = Cell::Disc(color);
        let mut flips = Vec::new();

        for (dr, dc) in DIRECTIONS {
            let mut r = pos.row as i32 + dr;
            let mut c = pos.col as i32 + dc;
            let mut line = Vec::new();

            while in_bounds(r, c) {
                let square = Position {
                    row: r as u8,
                    col: c as u8,
                };
                let cell = self.square(square);
                if cell == opp {
                    line.push(square);
                } else if cell == me {
                    flips.append(&mut line);
                    break;
                } else {
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips.sort_unstable();
        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight lines of `B`, `W` and `.`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Disc(Color::Black) => 'B',
                    Cell::Disc(Color::White) => 'W',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the `Display` format. Whitespace is ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        let mut count = 0usize;

        for ch in s.chars().filter(|ch| !ch.is_whitespace()) {
            let cell = match ch {
                '.' => Cell::Empty,
                'B' => Cell::Disc(Color::Black),
                'W' => Cell::Disc(Color::White),
                other => return Err(ParseBoardError::InvalidCell(other)),
            };
            if count < NUM_SQUARES {
                cells[count / BOARD_SIZE][count % BOARD_SIZE] = cell;
            }
            count += 1;
        }

        if count != NUM_SQUARES {
            return Err(ParseBoardError::WrongCellCount(count));
        }
        Ok(Self::from_cells(cells))
    }
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn initial_board_has_four_center_discs() {
        let board = Board::new();

        assert_eq!(board.counts(), (2, 2));
        assert_eq!(board.empty_count(), 60);
        assert_eq!(board.cell(pos(3, 3)), Some(Cell::Disc(Color::White)));
        assert_eq!(board.cell(pos(4, 4)), Some(Cell::Disc(Color::White)));
        assert_eq!(board.cell(pos(3, 4)), Some(Cell::Disc(Color::Black)));
        assert_eq!(board.cell(pos(4, 3)), Some(Cell::Disc(Color::Black)));

        let empty = board.to_array().iter().filter(|&&c| c == 0).count();
        assert_eq!(empty, 60);
    }

    #[test]
    fn t01_initial_black_legal_moves_are_four_expected_squares() {
        let legal = Board::new().legal_moves(Color::Black);

        assert_eq!(
            legal.positions(),
            vec![pos(2, 3), pos(3, 2), pos(4, 5), pos(5, 4)] // d3,c4,f5,e6
        );
        assert_eq!(legal.get(pos(2, 3)), Some(&[pos(3, 3)][..]));
        assert_eq!(legal.get(pos(3, 2)), Some(&[pos(3, 3)][..]));
        assert_eq!(legal.get(pos(4, 5)), Some(&[pos(4, 4)][..]));
        assert_eq!(legal.get(pos(5, 4)), Some(&[pos(4, 4)][..]));
    }

    #[test]
    fn place_flips_opponent_stones_and_updates_counts() {
        let mut board = Board::new();

        let flips = board.apply_move(pos(2, 3), Color::Black).unwrap(); // d3

        assert_eq!(flips, vec![pos(3, 3)]); // d4
        assert_eq!(board.counts(), (4, 1));
        assert_eq!(board.empty_count(), 59);

        let cells = board.to_array();
        assert_eq!(cells[pos(2, 3).index()], 1);
        assert_eq!(cells[pos(3, 3).index()], 1);
        assert_eq!(cells[pos(3, 4).index()], 1);
        assert_eq!(cells[pos(4, 3).index()], 1);
        assert_eq!(cells[pos(4, 4).index()], 2);
    }

    #[test]
    fn illegal_place_returns_error_and_keeps_board_unchanged() {
        let mut board = Board::new();
        let before = board;

        let err = board.apply_move(pos(0, 0), Color::Black).unwrap_err();

        assert_eq!(err, MoveError::IllegalMove { row: 0, col: 0 });
        assert_eq!(board, before);
    }

    #[test]
    fn occupied_square_is_never_legal() {
        let mut board = Board::new();

        assert!(board.apply_move(pos(3, 3), Color::Black).is_err());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn move_legal_for_one_color_is_rejected_for_the_other() {
        let mut board = Board::new();

        // d3 is black's move; white has nothing to bracket there.
        assert!(!board.legal_moves(Color::White).contains(pos(2, 3)));
        assert!(board.apply_move(pos(2, 3), Color::White).is_err());
    }

    #[test]
    fn captures_accumulate_across_directions() {
        let mut board = board(
            "........
             .B.B.B..
             ..WWW...
             .BW.WB..
             ..WWW...
             .B.B.B..
             ........
             ........",
        );

        let flips = board.apply_move(pos(3, 3), Color::Black).unwrap();

        assert_eq!(flips.len(), 8);
        assert_eq!(board.counts(), (17, 0));
    }

    #[test]
    fn unbracketed_runs_are_not_captured() {
        // Every white run ends at the edge or an empty square.
        let board = board(
            "B.WWWWWW
             ..W.....
             ..W.....
             ........
             ........
             ........
             ........
             ........",
        );

        let legal = board.legal_moves(Color::Black);

        assert!(!legal.contains(pos(0, 1)));
        assert!(legal.is_empty());
    }

    #[test]
    fn adjacent_own_disc_without_capture_is_illegal() {
        let board = board(
            "........
             ........
             ........
             ...B....
             ........
             ........
             ........
             ........",
        );

        assert!(board.legal_moves(Color::Black).is_empty());
    }

    #[test]
    fn capture_scan_does_not_wrap_around_edges() {
        // In row-major index order (0,7) is followed by (1,0).
        let board = board(
            "........
             WB......
             ........
             ........
             ........
             ........
             ........
             .......W",
        );

        let legal = board.legal_moves(Color::Black);

        assert!(!legal.contains(pos(0, 7)));
        assert!(legal.is_empty());
    }

    #[test]
    fn legal_moves_is_a_pure_function_of_the_grid() {
        let mut board = Board::new();
        board.apply_move(pos(2, 3), Color::Black).unwrap();

        for color in [Color::Black, Color::White] {
            assert_eq!(board.legal_moves(color), board.legal_moves(color));
        }
    }

    #[test]
    fn every_capture_lies_on_a_straight_line_from_the_move() {
        let mut board = Board::new();
        let mut color = Color::Black;

        for _ in 0..20 {
            let legal = board.legal_moves(color);
            for (mv, flips) in legal.iter() {
                for flip in flips {
                    let dr = flip.row as i32 - mv.row as i32;
                    let dc = flip.col as i32 - mv.col as i32;
                    assert!(dr == 0 || dc == 0 || dr.abs() == dc.abs());
                    assert_eq!(board.cell(*flip), Some(Cell::Disc(!color)));
                }
            }
            if let Some(first) = legal.positions().first() {
                board.apply_move(*first, color).unwrap();
            }
            color = !color;
        }
    }

    #[test]
    fn counts_always_match_grid() {
        let mut board = Board::new();
        let mut color = Color::Black;

        while !board.is_terminal() {
            let legal = board.legal_moves(color);
            if let Some(last) = legal.positions().last() {
                board.apply_move(*last, color).unwrap();
            }
            let (black, white) = board.counts();
            let occupied = board.to_array().iter().filter(|&&c| c != 0).count();
            assert_eq!(black as usize + white as usize, occupied);
            color = !color;
        }
    }

    #[test]
    fn winner_compares_counts_strictly() {
        let black = board("BB......\n........\n........\n........\n........\n........\n........\n.......W");
        let white = board("B.......\n........\n........\n........\n........\n........\n........\n......WW");
        let draw = board("B.......\n........\n........\n........\n........\n........\n........\n.......W");

        assert_eq!(black.winner(), Winner::Black);
        assert_eq!(white.winner(), Winner::White);
        assert_eq!(draw.winner(), Winner::Draw);
        assert!(draw.is_terminal());
        assert!(!Board::new().is_terminal());
    }

    #[test]
    fn cell_at_is_none_off_the_board() {
        let board = Board::new();

        assert_eq!(board.cell_at(3, 4), Some(Cell::Disc(Color::Black)));
        assert_eq!(board.cell_at(0, 0), Some(Cell::Empty));
        assert_eq!(board.cell_at(8, 0), None);
        assert_eq!(board.cell_at(0, 8), None);
    }

    #[test]
    fn out_of_range_position_is_rejected_without_panicking() {
        let mut board = Board::new();
        let off_board = Position { row: 8, col: 0 };

        assert_eq!(board.cell(off_board), None);
        assert_eq!(board.cell(Position { row: 0, col: 200 }), None);
        assert!(!board.legal_moves(Color::Black).contains(off_board));
        assert_eq!(
            board.apply_move(off_board, Color::Black),
            Err(MoveError::IllegalMove { row: 8, col: 0 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn text_format_round_trips_and_rejects_bad_input() {
        let board = Board::new();

        assert_eq!(board.to_string().parse::<Board>(), Ok(board));
        assert_eq!("x".parse::<Board>(), Err(ParseBoardError::InvalidCell('x')));
        assert_eq!("B.W".parse::<Board>(), Err(ParseBoardError::WrongCellCount(3)));
    }
}
