//! Browser binding
//!
//! The host page owns the canvas and the requestAnimationFrame loop. It
//! forwards key events and frame timestamps here and draws the returned
//! snapshot JSON.

use wasm_bindgen::prelude::*;

use super::clock::FixedStepClock;
use crate::level::LevelData;
use crate::settings::Settings;
use crate::sim::Scene;

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second game on the same page finds the logger already installed
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One running level driven by the host page
#[wasm_bindgen]
pub struct WebGame {
    scene: Scene,
    clock: FixedStepClock,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// Load a level; an empty string loads the built-in level
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: &str) -> Result<WebGame, JsValue> {
        init_logging();

        let level = if level_json.trim().is_empty() {
            LevelData::builtin()
        } else {
            LevelData::from_json(level_json)
        }
        .map_err(|err| {
            log::error!("Level rejected: {}", err);
            to_js(err)
        })?;

        let mut scene = level.build_scene().map_err(to_js)?;
        let settings = Settings::load();
        scene.bindings = settings.key_bindings.clone();

        Ok(WebGame {
            clock: FixedStepClock::new(scene.tuning.tick_interval_ms),
            scene,
            settings,
        })
    }

    pub fn key_down(&mut self, code: &str) {
        self.scene.key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.scene.key_up(code);
    }

    /// Release every held key (e.g. on window blur)
    pub fn release_keys(&mut self) {
        self.scene.held.clear();
    }

    /// Run the ticks due at `now_ms` and return the render snapshot as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let ticks = self.clock.advance_to(now_ms);
        for _ in 0..ticks {
            self.scene.game_tick().map_err(|err| {
                log::error!("Tick failed: {}", err);
                to_js(err)
            })?;
        }
        self.scene
            .advance_animations(ticks as f32 * self.clock.interval_ms());

        serde_json::to_string(&self.scene.render_snapshot()).map_err(to_js)
    }

    pub fn show_collisions(&self) -> bool {
        self.settings.show_collisions
    }

    pub fn set_show_collisions(&mut self, show: bool) {
        self.settings.show_collisions = show;
        self.settings.save();
    }

    pub fn show_debug(&self) -> bool {
        self.settings.show_debug
    }

    pub fn set_show_debug(&mut self, show: bool) {
        self.settings.show_debug = show;
        self.settings.save();
    }
}
