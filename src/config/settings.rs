//! Application settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Result;

/// User-tunable settings.
///
/// Absent fields fall back to the client defaults (the current user's
/// unresolved issues, page size 50).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// JQL used by the issue list when none is given on the command line.
    pub default_jql: Option<String>,
    /// Page size for issue searches.
    pub max_results: Option<u32>,
}

impl Settings {
    /// Load settings from the given file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
        assert!(settings.default_jql.is_none());
        assert!(settings.max_results.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "default_jql = \"project = X\"\nmax_results = 25\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_jql.as_deref(), Some("project = X"));
        assert_eq!(settings.max_results, Some(25));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not valid {{").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
