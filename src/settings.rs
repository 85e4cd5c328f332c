use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILENAME: &str = "navigator.yaml";
const APP_NAME: &str = "folio";

/// Tuning knobs for the pagination view.
///
/// Preload budgets are measured in positions (reading-progress units reported
/// by the delegate), not page indices, so dense short resources preload deeper
/// by index count than sparse long ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Positions to keep loaded ahead of the current page
    #[serde(default = "default_preload_next")]
    pub preload_next_positions: usize,

    /// Positions to keep loaded behind the current page
    #[serde(default = "default_preload_previous")]
    pub preload_previous_positions: usize,

    /// Row height assumed for virtualized rows whose view has not loaded yet
    #[serde(default = "default_placeholder_row_height")]
    pub placeholder_row_height: f32,

    /// Fade the viewport around cross-page jumps
    #[serde(default = "default_true")]
    pub animated_transitions: bool,
}

fn default_preload_next() -> usize {
    6
}

fn default_preload_previous() -> usize {
    2
}

fn default_placeholder_row_height() -> f32 {
    44.0
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preload_next_positions: default_preload_next(),
            preload_previous_positions: default_preload_previous(),
            placeholder_row_height: default_placeholder_row_height(),
            animated_transitions: default_true(),
        }
    }
}

impl Settings {
    /// Default location of the settings file inside the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
    }

    /// Loads settings from a YAML file, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    debug!("Loaded navigator settings from {path:?}");
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings file {path:?}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persists settings as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
