// Per-user configuration, read once at startup.
//
// The file lives at `%APPDATA%\scanserv\config.toml` on Windows and
// `~/.config/scanserv/config.toml` elsewhere. Every key is optional; missing
// keys take the built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://scan.home";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the scanservjs service.
    pub server: String,
    /// 1-based index of the scanner used for `--scan`.
    pub device: usize,
    pub scan: ScanDefaults,
    pub files: FilesConfig,
    pub http: HttpConfig,
}

/// Scan parameters used when the command line does not override them.
/// Mode and quality stay strings here so a typo is reported when a scan is
/// requested rather than silently discarding the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    pub resolution: i64,
    pub mode: String,
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout. Scans block until the page is digitised, so
    /// this has to cover a slow high-resolution pass.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            device: 1,
            scan: ScanDefaults::default(),
            files: FilesConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            resolution: 200,
            mode: "Color".to_string(),
            quality: "high".to_string(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scans"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}

impl HttpConfig {
    /// Both timeouts must be at least one second; a zero timeout would fail
    /// every request immediately.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(crate::error::Error::Validation(format!(
                "http timeouts must be at least 1 second (timeout_secs = {}, connect_timeout_secs = {})",
                self.timeout_secs, self.connect_timeout_secs
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    /// Platform location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        let dir = if cfg!(windows) {
            std::env::var_os("APPDATA")
                .map(PathBuf::from)
                .or_else(dirs::config_dir)?
        } else {
            dirs::home_dir()?.join(".config")
        };
        Some(dir.join("scanserv").join("config.toml"))
    }

    /// Load the per-user configuration. A missing file yields the defaults;
    /// an unreadable or malformed one is reported as a warning and the
    /// defaults are used instead.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::debug!("no home directory, using built-in configuration");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("{} not found, using built-in configuration", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring configuration file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load a specific file. Errors are returned to the caller.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
