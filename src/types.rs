use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Disc color, also used to name the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Moves first.
    #[default]
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Shell encoding: 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Color::Black => 1,
            Color::White => 2,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    fn not(self) -> Self {
        self.opponent()
    }
}

/// Contents of one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Disc(Color),
}

impl Cell {
    /// Shell encoding: 0=empty, 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Disc(color) => color.to_u8(),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A board coordinate. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Returns `None` outside the 8x8 grid.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row-major square index (0..=63).
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }
}

/// Outcome by disc count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress(Color),
    /// Absorbing until reset.
    Terminal(Winner),
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: Vec<u8>,
    pub current_player: u8,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    pub winner: Option<Winner>,
    pub legal_moves: Vec<Position>,
    /// Contract:
    /// - `true` when the opponent had to pass after the previous move and
    ///   play continues.
    /// - `false` otherwise, including a pass that ends the game.
    pub is_pass: bool,
    /// Contract:
    /// - After a move: positions flipped by it, row-major order.
    /// - Fresh game: empty.
    pub flipped: Vec<Position>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Winner,
    pub black_count: u8,
    pub white_count: u8,
}
