use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::geometry::Crs;
use crate::polyline::{DEFAULT_PRECISION, PolylineOptions};

const CONFIG_NAME: &str = "kadasrouting";

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

/// Settings read from `kadasrouting.toml`; command line flags take precedence
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    /// Polyline precision used by the routing service
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Whether shapes carry elevation
    #[serde(default)]
    pub three_d: bool,
    /// CRS of avoid areas when none is given on the command line
    #[serde(default)]
    pub source_crs: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            three_d: false,
            source_crs: None,
            verbose: false,
        }
    }
}

impl FileConfig {
    /// Load the first readable config file from the standard locations
    pub fn load() -> Option<Self> {
        Self::load_first(&get_config_paths())
    }

    /// Read an explicitly requested config file; a missing file is an error
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!(path = ?path, error = %e, "failed to parse config file");
                    }
                }
            }
        }
        None
    }

    pub fn polyline_options(&self) -> PolylineOptions {
        PolylineOptions::new(self.precision).with_3d(self.three_d)
    }

    pub fn source_crs(&self) -> Option<Crs> {
        self.source_crs
            .as_deref()
            .and_then(|s| s.parse::<Crs>().ok())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let file_name = format!("{}.toml", CONFIG_NAME);
    let mut paths = vec![
        PathBuf::from(&file_name),
        PathBuf::from(format!(".{}", file_name)),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_NAME).join("config.toml"));
        paths.push(config_dir.join(&file_name));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}", file_name)));
    }

    paths
}
