use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
/// Human-readable names for per-point class ids.
///
/// ```toml
/// [classes.labels]
/// 2 = "ground"
/// 6 = "building"
/// ```
pub struct ClassOptions {
    /// Class id (as written in the file) to label.
    pub labels: FxHashMap<String, String>,
}

impl ClassOptions {
    /// Label for `class`, if one is configured.
    #[must_use]
    pub fn label(&self, class: i32) -> Option<&str> {
        self.labels.get(&class.to_string()).map(String::as_str)
    }

    /// `label (id)` when a label is configured, else the bare id.
    #[must_use]
    pub fn describe(&self, class: i32) -> String {
        self.label(class).map_or_else(
            || class.to_string(),
            |label| format!("{label} ({class})"),
        )
    }
}
