//! Standard paths used by pomo

use std::path::PathBuf;

/// Standard pomo paths
pub struct Paths {
    /// Data directory (~/.local/share/pomo)
    pub data: PathBuf,
    /// Config directory (~/.config/pomo)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pomo");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pomo");

        Self { data, config }
    }

    /// Get the config file path
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Get the default log file path
    pub fn log_file(&self) -> PathBuf {
        self.data.join("pomo.log")
    }
}
