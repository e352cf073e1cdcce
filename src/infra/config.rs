// ============================================================
// Layer 6 — Application Config
// ============================================================
// Settings shared by every command, read from an optional JSON file.
//
// Example config.json:
//   {
//     "image_dir": "images",
//     "author": "GV Huỳnh Văn Lợi",
//     "kprime_lowercase_option": true
//   }
//
// Absent keys take their defaults and unknown keys are ignored.
// A missing file means "all defaults"; a malformed one is reported
// with a warning and also falls back to defaults, so a broken
// config never blocks a conversion.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sub-directory of the output directory for extracted images
    pub image_dir: String,

    /// Stamped into metadata.author of every parsed question
    pub author: String,

    /// Lowercase option letters ("a)", "b.") mark a kprime question
    pub kprime_lowercase_option: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_dir:               "images".to_string(),
            author:                  "GV Huỳnh Văn Lợi".to_string(),
            kprime_lowercase_option: true,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("No config at '{}' ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<AppConfig>(&raw) {
            Ok(cfg) => {
                tracing::debug!("Loaded config from '{}'", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!("Malformed config '{}': {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::load(None);
        assert_eq!(cfg.image_dir, "images");
        assert!(cfg.kprime_lowercase_option);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"author": "GV A", "unknown": 1}"#).unwrap();

        let cfg = AppConfig::load(Some(&path));
        assert_eq!(cfg.author, "GV A");
        assert_eq!(cfg.image_dir, "images");
    }

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load(Some(&dir.path().join("none.json"))), AppConfig::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(AppConfig::load(Some(&bad)), AppConfig::default());
    }
}
