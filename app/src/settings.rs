use engine::Difficulty;
use serde::{Deserialize, Serialize};

use crate::log;
use crate::storage::{KeyValueStore, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPalette {
    Earth,
    Sunset,
    Modern,
}

/// Persisted user configuration. Every field has a serde default so blobs
/// written before a field existed still load; unknown fields pick up their
/// default values instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(rename = "defaultAIDifficulty")]
    pub default_ai_difficulty: Difficulty,
    pub haptic_feedback: bool,
    pub sound_effects: bool,
    pub theme: ThemePreference,
    pub color_palette: ColorPalette,
    pub alternate_first_player: bool,
    pub default_player_x_name: String,
    pub default_player_o_name: String,
    pub confirm_reset: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_ai_difficulty: Difficulty::Medium,
            haptic_feedback: true,
            sound_effects: false,
            theme: ThemePreference::System,
            color_palette: ColorPalette::Earth,
            alternate_first_player: false,
            default_player_x_name: "Player 1".to_string(),
            default_player_o_name: "Player 2".to_string(),
            confirm_reset: true,
        }
    }
}

pub struct SettingsService<S: KeyValueStore> {
    store: S,
    settings: Settings,
}

impl<S: KeyValueStore> SettingsService<S> {
    pub async fn load(store: S) -> Self {
        let settings = match store.get(SETTINGS_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log!("Failed to parse settings, falling back to defaults: {}", e);
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                log!("Failed to load settings, falling back to defaults: {}", e);
                Settings::default()
            }
        };

        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies the new settings in memory, then saves best-effort.
    pub async fn update(&mut self, settings: Settings) {
        self.settings = settings;
        match serde_json::to_string(&self.settings) {
            Ok(json) => {
                if let Err(e) = self.store.set(SETTINGS_KEY, json).await {
                    log!("Failed to save settings: {}", e);
                }
            }
            Err(e) => log!("Failed to serialize settings: {}", e),
        }
    }
}
