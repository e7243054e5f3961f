use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show the short task id in listings.
    /// Default: see CONFIG_TEMPLATE in src/io/config_io.rs
    #[serde(default = "default_true")]
    pub show_ids: bool,
    /// Descriptions wider than this many terminal cells are truncated with `…`.
    /// 0 disables truncation.
    #[serde(default = "default_description_width")]
    pub max_description_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_ids: true,
            max_description_width: default_description_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base level for diagnostics on stderr (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_description_width() -> usize {
    60
}

fn default_log_level() -> String {
    "warn".to_string()
}
