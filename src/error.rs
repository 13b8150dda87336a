/// Rejected move submissions. Neither variant mutates any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: u8, col: u8 },

    #[error("game is already over")]
    GameAlreadyOver,
}

/// Errors from reading the text board format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("invalid cell character {0:?} (expected 'B', 'W' or '.')")]
    InvalidCell(char),

    #[error("expected 64 cells, got {0}")]
    WrongCellCount(usize),
}
