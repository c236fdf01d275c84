//! Player preferences
//!
//! Persisted separately from the simulation in LocalStorage.

use serde::{Deserialize, Serialize};

/// Something a held key asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Right,
    Left,
    Jump,
}

/// Physical key codes (e.g. `"ArrowRight"`, `"KeyD"`) bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub right: Vec<String>,
    pub left: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            right: vec!["ArrowRight".into(), "KeyD".into()],
            left: vec!["ArrowLeft".into(), "KeyA".into()],
            jump: vec!["ArrowUp".into(), "KeyW".into(), "Space".into()],
        }
    }
}

impl KeyBindings {
    /// Action bound to `code`, if any
    pub fn action_for(&self, code: &str) -> Option<Action> {
        let bound = |codes: &[String]| codes.iter().any(|c| c == code);
        if bound(&self.right) {
            Some(Action::Right)
        } else if bound(&self.left) {
            Some(Action::Left)
        } else if bound(&self.jump) {
            Some(Action::Jump)
        } else {
            None
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub key_bindings: KeyBindings,
    /// Draw collision segments and circles
    pub show_collisions: bool,
    /// Show tick counter and player state
    pub show_debug: bool,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cloud_roll_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for("ArrowRight"), Some(Action::Right));
        assert_eq!(bindings.action_for("KeyA"), Some(Action::Left));
        assert_eq!(bindings.action_for("Space"), Some(Action::Jump));
        assert_eq!(bindings.action_for("KeyQ"), None);
        // Codes, not characters
        assert_eq!(bindings.action_for("d"), None);
    }

    #[test]
    fn test_settings_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"show_debug": true}"#).expect("valid settings");
        assert!(settings.show_debug);
        assert_eq!(settings.key_bindings, KeyBindings::default());
    }
}
