use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "COUNTRY_DASHBOARD_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Combined indicator table loaded at startup.
    pub data_path: PathBuf,
    /// Country shown in the headline metrics when present in the table.
    pub default_country: String,
    /// Compared alongside the selected country by default.
    pub comparison_countries: Vec<String>,
    /// Year labels selected for comparison by default.
    pub default_years: Vec<String>,
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("df_combined.csv"),
            default_country: "Brazil".to_string(),
            comparison_countries: vec!["United States".to_string()],
            default_years: (2015..=2023).map(|y: i32| y.to_string()).collect(),
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from `COUNTRY_DASHBOARD_CONFIG` and the
    /// command line. The first positional argument overrides `data_path`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(data_path) = std::env::args_os().nth(1) {
            config.data_path = PathBuf::from(data_path);
        }
        log::debug!("Using configuration {config:?}");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
