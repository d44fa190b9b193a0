// ABOUTME: JSON configuration file for the blogport binary.
// ABOUTME: Holds importer and header options; missing sections and keys fall back to defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use blogport_decorate::HeaderOptions;
use blogport_importer::ImportOptions;

/// Top-level config file shape:
///
/// ```json
/// { "import": { "proxy_origin": "http://localhost:4000" },
///   "header": { "site_origin": "https://www.example.com", "timeout_secs": 5 } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportOptions,
    /// Also supplies timeout and user agent for page fetches.
    pub header: HeaderOptions,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: Config = serde_json::from_str(
            r#"{"import": {"proxy_origin": "http://localhost:4000"}, "header": {"timeout_secs": 3}}"#,
        )
        .unwrap();
        assert_eq!(cfg.import.proxy_origin, "http://localhost:4000");
        assert_eq!(cfg.import.main_selector, ".blogPostMain");
        assert_eq!(cfg.header.timeout, Duration::from_secs(3));
        assert_eq!(cfg.header.nav_path, "/nav.plain.html");
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.header.site_origin, "https://www.bamboohr.com");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::load(Path::new("/nonexistent/blogport.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blogport.json"));
    }
}
