//! Browser bindings
//!
//! The page owns the canvas, the requestAnimationFrame loop and the audio
//! graph. It forwards key events and frame timestamps here. Each frame
//! returns JSON with the snapshot (entities, road profile, events, HUD) and
//! the sound cues plus engine mix to play.

use wasm_bindgen::prelude::*;

use crate::audio::BufferedAudio;
use crate::highscores::BestScore;
use crate::persistence::LocalStorageStore;
use crate::platform::{self, Driver, HeadlessRenderer};
use crate::sim::GameState;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Endless Drive (web) loaded");
}

/// One game instance bound to a page
#[wasm_bindgen]
pub struct WebGame {
    driver: Driver<LocalStorageStore, BufferedAudio, HeadlessRenderer>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty to use the built-in defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, tuning_json: &str) -> WebGame {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            })
        };
        let store = LocalStorageStore;
        let best = BestScore::load(&store);
        let state = GameState::new(u64::from(seed), tuning).with_best(best);
        WebGame {
            driver: Driver::new(state, store, BufferedAudio::new(), HeadlessRenderer::new()),
        }
    }

    /// Forward a `KeyboardEvent.code`; returns true if the game used it
    pub fn key(&mut self, code: &str, down: bool) -> bool {
        platform::apply_key(self.driver.input_mut(), code, down)
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.driver.input_mut().autopilot = on;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.driver.audio_mut().set_muted(muted);
    }

    /// Page hidden or window blurred
    pub fn suspend(&mut self) {
        self.driver.suspend();
    }

    pub fn set_volume(&mut self, master: f32) {
        self.driver.audio_mut().set_master_volume(master);
    }

    /// Advance one frame and return its snapshot and audio as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        self.driver
            .frame_json(now_ms)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Road centre offset at `depth`
    pub fn path_x(&self, depth: f32) -> f32 {
        self.driver.state().path.path_x(depth)
    }

    /// Road elevation at `depth` for the current progress
    pub fn path_y(&self, depth: f32) -> f32 {
        let state = self.driver.state();
        state.path.path_y(depth, state.progress)
    }
}
