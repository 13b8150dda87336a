use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::GameController;

/// JS handle to one game session.
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameController,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined`, `null` or `{ firstPlayer: "black" | "white" }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
        let config = parse_config(config)?;
        Ok(Self {
            inner: GameController::with_config(config),
        })
    }

    /// Plays a move for the side to move and returns the new state.
    pub fn place(&mut self, row: u8, col: u8) -> Result<JsValue, JsError> {
        self.inner.submit(row, col)?;
        self.state()
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_game_state())?)
    }

    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(
            &self.inner.legal_moves().positions(),
        )?)
    }

    /// `null` while the game is in progress.
    pub fn result(&self) -> Result<JsValue, JsError> {
        match self.inner.to_game_result() {
            Some(result) => Ok(serde_wasm_bindgen::to_value(&result)?),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

fn parse_config(config: JsValue) -> Result<GameConfig, serde_wasm_bindgen::Error> {
    if config.is_undefined() || config.is_null() {
        return Ok(GameConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
}
