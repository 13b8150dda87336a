use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::{Board, LegalMoveSet};
pub use config::GameConfig;
pub use error::{MoveError, ParseBoardError};
pub use game::GameController;
pub use types::{Cell, Color, GameResult, GameState, GameStatus, Position, Winner};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
