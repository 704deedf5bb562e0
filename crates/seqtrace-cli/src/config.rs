use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "seqtrace.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Template configuration file; built-in templates are used when unset.
    #[serde(default)]
    pub template_file: Option<PathBuf>,

    #[serde(default = "default_overview_event_limit")]
    pub overview_event_limit: usize,

    #[serde(default = "default_max_events_per_diagram")]
    pub max_events_per_diagram: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_overview_event_limit() -> usize {
    20
}

fn default_max_events_per_diagram() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template_file: None,
            overview_event_limit: default_overview_event_limit(),
            max_events_per_diagram: default_max_events_per_diagram(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from `seqtrace.toml` in the working
    /// directory. A missing file yields the defaults; a present but broken
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if !path.exists() {
            if explicit.is_some() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seqtrace.toml");
        std::fs::write(&path, "output_dir = \"artifacts\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
        assert_eq!(config.overview_event_limit, 20);
        assert_eq!(config.max_events_per_diagram, 1000);
        assert!(config.template_file.is_none());
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seqtrace.toml");
        std::fs::write(
            &path,
            "output_dir = \"out\"\ntemplate_file = \"templates.json\"\noverview_event_limit = 5\nmax_events_per_diagram = 50\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.overview_event_limit, 5);
        assert_eq!(config.max_events_per_diagram, 50);
        assert_eq!(config.template_file, Some(PathBuf::from("templates.json")));
    }
}
