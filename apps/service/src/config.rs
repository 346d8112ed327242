use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};

use crate::validation;

#[derive(Debug)]
pub enum Error {
    ReadFailed(()),
    WriteFailed(()),
    ParseFailed(()),
    ConfigPathUnavailable,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitoring: Monitoring,
    pub debounce: Debounce,
    pub history: History,
    pub storage: Storage,
    pub admins: Admins,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitoring {
    /// Default ping interval for newly added urls, in seconds
    pub interval_seconds: u64,
    /// Per-probe request timeout, in seconds
    pub timeout_seconds: u64,
    /// Redirects followed before a probe counts as a redirect loop
    pub max_redirects: usize,
    /// Inclusive HTTP status range treated as success
    pub accepted_status_min: u16,
    pub accepted_status_max: u16,
    /// Delay before a freshly added target's first probe, in seconds
    pub initial_delay_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Debounce {
    /// Consecutive failures required to confirm DOWN
    pub down_threshold: u32,
    /// Consecutive successes required to confirm UP
    pub up_threshold: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    pub max_records_per_target: usize,
    pub max_record_age_hours: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub data_file: path::PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Admins {
    /// Chat ids allowed to mutate the target catalog
    pub chat_ids: Vec<i64>,
}

impl Default for Monitoring {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            timeout_seconds: 30,
            max_redirects: 10,
            accepted_status_min: 200,
            accepted_status_max: 399,
            initial_delay_seconds: 0,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self { down_threshold: 2, up_threshold: 2 }
    }
}

impl Default for History {
    fn default() -> Self {
        Self { max_records_per_target: 500, max_record_age_hours: 168 }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self { data_file: path::PathBuf::from("upwatch_state.json") }
    }
}

impl Default for Admins {
    fn default() -> Self {
        Self { chat_ids: Vec::new() }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/upwatch/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("upwatch/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Monitoring")?;
        write_1(f, "Ping Interval", &format!("{}s", self.monitoring.interval_seconds))?;
        write_1(f, "Probe Timeout", &format!("{}s", self.monitoring.timeout_seconds))?;
        write_1(f, "Max Redirects", &self.monitoring.max_redirects)?;
        write_1(
            f,
            "Accepted Status",
            &format!(
                "{}-{}",
                self.monitoring.accepted_status_min, self.monitoring.accepted_status_max
            ),
        )?;
        write_title_1(f, "Debounce")?;
        write_1(f, "Down Threshold", &self.debounce.down_threshold)?;
        write_1(f, "Up Threshold", &self.debounce.up_threshold)?;
        write_title_1(f, "History")?;
        write_1(f, "Max Records", &self.history.max_records_per_target)?;
        write_1(f, "Max Record Age", &format!("{}h", self.history.max_record_age_hours))?;
        write_title_1(f, "Storage")?;
        write_1(f, "Data File", &self.storage.data_file.display())?;
        write_title_1(f, "Admins")?;
        write_1(f, "Count", &self.admins.chat_ids.len())?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/upwatch/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string =
                fs::read_to_string(&config_path).map_err(|_err| Error::ReadFailed(()))?;
            toml::from_str(raw_string.as_str()).map_err(|_err| Error::ParseFailed(()))
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &std::path::Path) -> Result<(), Error> {
        let config_str: String =
            toml::to_string_pretty(self).map_err(|_err| Error::ParseFailed(()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|_err| Error::WriteFailed(()))?;
        }

        std::fs::write(path, config_str).map_err(|_err| Error::WriteFailed(()))
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_check_interval(self.monitoring.interval_seconds)?;
        validation::validate_timeout(self.monitoring.timeout_seconds)?;

        if self.debounce.down_threshold < 1 || self.debounce.up_threshold < 1 {
            anyhow::bail!("Debounce thresholds must be at least 1");
        }

        if self.monitoring.accepted_status_min > self.monitoring.accepted_status_max {
            anyhow::bail!(
                "Accepted status range is inverted: {} > {}",
                self.monitoring.accepted_status_min,
                self.monitoring.accepted_status_max
            );
        }

        if self.history.max_records_per_target == 0 {
            anyhow::bail!("History retention must keep at least one record per target");
        }

        Ok(())
    }
}
