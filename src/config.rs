use serde::Deserialize;

use crate::types::Color;

/// Per-game options supplied by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Side that moves first. Othello convention is black.
    pub first_player: Color,
}

impl GameConfig {
    pub fn with_first_player(first_player: Color) -> Self {
        Self { first_player }
    }
}
