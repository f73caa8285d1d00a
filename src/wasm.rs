//! Browser host bindings
//!
//! JavaScript owns the canvas, the keyboard and `requestAnimationFrame`; it
//! forwards key presses and frame timestamps here and paints the returned
//! draw list.

use wasm_bindgen::prelude::*;

use crate::renderer::draw_list;
use crate::settings::MatchConfig;
use crate::sim::{Direction, Field, FixedStep, ManualClock, MatchState, PlayerId};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Braket starting...");
}

/// One match driven by the page
#[wasm_bindgen]
pub struct WasmMatch {
    state: MatchState,
    step: FixedStep,
    clock: ManualClock,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Start a match from a JSON config (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmMatch, JsValue> {
        let config = if config_json.trim().is_empty() {
            MatchConfig::default()
        } else {
            MatchConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let step = FixedStep::from_config(&config);
        let state = MatchState::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            state,
            step,
            clock: ManualClock::new(),
        })
    }

    /// Queue one paddle step (arrow key press)
    pub fn move_paddle(&mut self, player: usize, right: bool) -> Result<(), JsValue> {
        let direction = if right { Direction::Right } else { Direction::Left };
        self.state
            .queue_move(PlayerId(player), direction)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    /// Canvas was resized
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.state
            .set_field(Field::new(width, height))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run the ticks due at `time_ms` (a `requestAnimationFrame` timestamp)
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        self.clock.set(time_ms / 1000.0);
        self.step.pump(&self.clock, &mut self.state)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Draw commands for the current state, as JSON
    pub fn draw_list_json(&self) -> String {
        serde_json::to_string(&draw_list(&self.state)).unwrap_or_default()
    }

    /// Current `(player, score)` pairs, as JSON
    pub fn scores_json(&self) -> String {
        serde_json::to_string(&self.state.scores()).unwrap_or_default()
    }

    /// Events from the most recent tick, as JSON
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.state.events).unwrap_or_default()
    }

    /// End-of-game text once the match is over
    pub fn summary_text(&self) -> Option<String> {
        self.state.summary().map(|s| s.to_string())
    }
}
