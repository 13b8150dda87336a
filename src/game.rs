use log::trace;

use crate::board::{Board, LegalMoveSet};
use crate::config::GameConfig;
use crate::error::MoveError;
use crate::types::{Color, GameResult, GameState, GameStatus, Position, Winner};

/// Turn ownership, forced passes and game end on top of one [`Board`].
#[derive(Debug, Clone)]
pub struct GameController {
    board: Board,
    config: GameConfig,
    side_to_move: Color,
    legal_moves: LegalMoveSet,
    pass_count: u8,
    winner: Option<Winner>,
    is_pass: bool,
    flipped: Vec<Position>,
}

impl GameController {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::start(Board::new(), config)
    }

    /// Starts from an arbitrary position. If `first_player` cannot move the
    /// usual pass rules apply, so a blocked position starts terminal.
    pub fn from_position(board: Board, first_player: Color) -> Self {
        Self::start(board, GameConfig::with_first_player(first_player))
    }

    fn start(board: Board, config: GameConfig) -> Self {
        let mut game = Self {
            board,
            config,
            side_to_move: !config.first_player,
            legal_moves: LegalMoveSet::default(),
            pass_count: 0,
            winner: None,
            is_pass: false,
            flipped: Vec::new(),
        };
        game.advance_turn();
        game
    }

    /// Plays `(row, col)` for the side to move.
    /// Coordinates off the board are reported as illegal moves.
    pub fn submit(&mut self, row: u8, col: u8) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }

        let pos = Position::new(row, col).ok_or(MoveError::IllegalMove { row, col })?;
        self.submit_move(pos)
    }

    pub fn submit_move(&mut self, pos: Position) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !self.legal_moves.contains(pos) {
            return Err(MoveError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }

        let flipped = self.board.apply_move(pos, self.side_to_move)?;
        trace!(
            "{:?} played ({}, {}), flipping {}",
            self.side_to_move,
            pos.row,
            pos.col,
            flipped.len()
        );

        self.flipped = flipped;
        self.pass_count = 0;
        self.advance_turn();
        Ok(())
    }

    /// Discards the board and starts a fresh game with the same config.
    pub fn reset(&mut self) {
        trace!("resetting game");
        *self = Self::with_config(self.config);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Side to move; after game end, the side that would have moved next.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(winner) => GameStatus::Terminal(winner),
            None => GameStatus::InProgress(self.side_to_move),
        }
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> &LegalMoveSet {
        &self.legal_moves
    }

    pub fn pass_count(&self) -> u8 {
        self.pass_count
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Returns `(black_count, white_count)`.
    pub fn counts(&self) -> (u8, u8) {
        self.board.counts()
    }

    /// Discs flipped by the last successful move.
    pub fn last_flipped(&self) -> &[Position] {
        &self.flipped
    }

    /// Whether the opponent was forced to pass after the last move and play
    /// continues. A pass that ends the game is reported as game over instead.
    pub fn is_pass(&self) -> bool {
        self.is_pass
    }

    pub fn to_game_state(&self) -> GameState {
        let (black_count, white_count) = self.board.counts();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.side_to_move.to_u8(),
            black_count,
            white_count,
            is_game_over: self.is_terminal(),
            winner: self.winner,
            legal_moves: self.legal_moves.positions(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
        }
    }

    /// `None` while the game is in progress.
    pub fn to_game_result(&self) -> Option<GameResult> {
        let (black_count, white_count) = self.board.counts();
        self.winner.map(|winner| GameResult {
            winner,
            black_count,
            white_count,
        })
    }

    fn advance_turn(&mut self) {
        let mover = self.side_to_move;
        self.side_to_move = !mover;
        self.legal_moves = self.board.legal_moves(self.side_to_move);

        if !self.legal_moves.is_empty() {
            self.pass_count = 0;
            self.is_pass = false;
            return;
        }

        self.pass_count += 1;
        let mover_moves = self.board.legal_moves(mover);
        // A move clears the counter first, so in practice the game ends on
        // `mover_moves` being empty; the count check covers direct callers.
        if self.pass_count >= 2 || mover_moves.is_empty() {
            self.is_pass = false;
            self.finish();
            return;
        }

        trace!("{:?} has no legal move and passes", self.side_to_move);
        self.side_to_move = mover;
        self.legal_moves = mover_moves;
        self.is_pass = true;
    }

    fn finish(&mut self) {
        let winner = self.board.winner();
        let (black_count, white_count) = self.board.counts();
        trace!("game over: {winner:?} ({black_count}-{white_count})");

        self.winner = Some(winner);
        self.legal_moves = LegalMoveSet::default();
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}
