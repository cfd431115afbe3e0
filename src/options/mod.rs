//! Viewer options with TOML file support.
//!
//! Camera, display, free-fly steps, keybindings and class labels are
//! consolidated here. Every section uses `#[serde(default)]` so partial
//! files (e.g. only overriding `[display]`) work.

mod camera;
mod classes;
mod display;
mod free_fly;
mod keybindings;

use std::path::Path;

pub use camera::CameraOptions;
pub use classes::ClassOptions;
pub use display::{DisplayOptions, MAX_POINT_SIZE, MIN_POINT_SIZE};
pub use free_fly::FreeFlyOptions;
pub use keybindings::KeybindingOptions;
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Point sizes, colors and anti-aliasing.
    pub display: DisplayOptions,
    /// Free-fly step magnitudes.
    pub free_fly: FreeFlyOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
    /// Class id labels.
    pub classes: ClassOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Io`] if the file cannot be read and
    /// [`CloudError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, CloudError> {
        let content = std::fs::read_to_string(path).map_err(CloudError::Io)?;
        toml::from_str(&content)
            .map_err(|e| CloudError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::OptionsParse`] if serialization fails and
    /// [`CloudError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CloudError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CloudError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CloudError::Io)?;
        }
        std::fs::write(path, content).map_err(CloudError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let mut opts = Options::default();
        let _ = opts
            .classes
            .labels
            .insert("2".into(), "ground".into());
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
point_size = 5.0

[keybindings]
toggle_free_fly = "KeyF"

[classes.labels]
6 = "building"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.display.point_size, 5.0);
        assert_eq!(opts.display.msaa_samples, 4);
        assert_eq!(opts.free_fly, FreeFlyOptions::default());
        assert_eq!(opts.keybindings.move_forward, "KeyW");
        assert_eq!(
            opts.keybindings.lookup("KeyF"),
            Some(KeyAction::ToggleFreeFly)
        );
        assert_eq!(opts.keybindings.lookup("KeyI"), None);
        assert_eq!(opts.classes.label(6), Some("building"));
    }

    #[test]
    fn keybinding_lookup() {
        let keys = KeybindingOptions::default();
        assert_eq!(keys.lookup("KeyI"), Some(KeyAction::ToggleFreeFly));
        assert_eq!(keys.lookup("KeyW"), Some(KeyAction::MoveForward));
        assert_eq!(keys.lookup("KeyD"), Some(KeyAction::MoveRight));
        assert_eq!(keys.lookup("Minus"), Some(KeyAction::DecreasePointSize));
        assert_eq!(keys.lookup("KeyZ"), None);
    }

    #[test]
    fn free_fly_steps_default() {
        let steps = FreeFlyOptions::default();
        assert_eq!(steps.forward_step, 0.3);
        assert_eq!(steps.lateral_step, 1.8);
    }

    #[test]
    fn point_size_is_clamped() {
        let mut display = DisplayOptions::default();
        display.adjust_point_size(-100.0);
        assert_eq!(display.point_size, MIN_POINT_SIZE);
        display.adjust_point_size(100.0);
        assert_eq!(display.point_size, MAX_POINT_SIZE);
    }

    #[test]
    fn sample_count_normalizes() {
        let mut display = DisplayOptions::default();
        display.msaa_samples = 2;
        assert_eq!(display.sample_count(), 1);
        display.msaa_samples = 8;
        assert_eq!(display.sample_count(), 4);
    }

    #[test]
    fn class_description_falls_back_to_id() {
        let mut classes = ClassOptions::default();
        let _ = classes.labels.insert("1".into(), "tree".into());
        assert_eq!(classes.describe(1), "tree (1)");
        assert_eq!(classes.describe(9), "9");
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("cloud-interpreter-opts-{}", std::process::id()));
        let path = dir.join("options.toml");
        let mut opts = Options::default();
        opts.free_fly.lateral_step = 3.5;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = toml::from_str::<Options>("[display]\npoint_size = \"big\"")
            .map_err(|e| CloudError::OptionsParse(e.to_string()))
            .unwrap_err();
        assert!(matches!(err, CloudError::OptionsParse(_)));
    }
}
