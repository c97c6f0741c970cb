//! `AppConfig` struct and JSON/TOML read.

use std::path::{Path, PathBuf};
use std::time::{Duration, TryFromFloatSecsError};

use cowin_api::DEFAULT_BASE_URL;
use cowin_watch::{FilterConfig, MediaPlayer, Region, WatchSettings};
use serde::{Deserialize, Serialize};
use url::Url;

/// Why a config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigReadError {
    /// The file does not exist.
    #[error("config file {} not found", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not a valid JSON/TOML config object.
    #[error("failed to parse {}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A value is out of range.
    #[error("invalid config {}: {reason}", path.display())]
    Invalid {
        /// Path of the file.
        path: PathBuf,
        /// What is wrong.
        reason: String,
    },
}

/// Top-level application configuration.
///
/// Every key is optional; missing keys take their default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// State to watch.
    pub state_name: String,
    /// District to watch.
    pub district_name: String,
    /// Age of the person to vaccinate.
    pub min_age: u32,
    /// Consecutive 7-day windows checked per iteration.
    pub weeks_to_check: u32,
    /// Minutes to pause between iterations.
    pub repeat_after_mins: f64,
    /// File overwritten with each alert batch.
    pub output_file: PathBuf,
    /// Address substrings, any of which must appear; empty means any address.
    pub address_contains: Vec<String>,
    /// Audio played when sessions are found.
    pub alert_sound: PathBuf,
    /// Audio played on a fatal error.
    pub error_sound: PathBuf,
    /// Media player executable.
    pub player_command: String,
    /// Upstream API root.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_name: String::from("West Bengal"),
            district_name: String::from("Kolkata"),
            min_age: 18,
            weeks_to_check: 3,
            repeat_after_mins: 1.0,
            output_file: PathBuf::from("vaccine_available.json"),
            address_contains: Vec::new(),
            alert_sound: PathBuf::from("alert.mp3"),
            error_sound: PathBuf::from("error.mp3"),
            player_command: String::from(MediaPlayer::DEFAULT_PROGRAM),
            api_base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_secs: 30,
        }
    }
}

/// Longest accepted pause between iterations (one year).
const MAX_REPEAT_AFTER_MINS: f64 = 525_600.0;

/// Returns `true` if `path` has a `.toml` extension (any case).
fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

impl AppConfig {
    /// Loads and validates config from `path`.
    ///
    /// The file is parsed as TOML if its extension is `.toml`, otherwise as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigReadError`] describing why the file cannot be used.
    pub fn load(path: &Path) -> Result<Self, ConfigReadError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigReadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigReadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config: Self = if is_toml(path) {
            toml::from_str(&content).map_err(|e| ConfigReadError::Parse {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigReadError::Parse {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?
        };

        config.validate().map_err(|reason| ConfigReadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Loads config from `path`, falling back to defaults on any error.
    ///
    /// The reason for a fallback is logged at `warn`.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source = ?std::error::Error::source(&e).map(ToString::to_string),
                    "Using default configuration"
                );
                Self::default()
            }
        }
    }

    /// Checks value ranges. Returns the first problem found.
    fn validate(&self) -> Result<(), String> {
        if self.weeks_to_check == 0 {
            return Err(String::from("weeks_to_check must be at least 1"));
        }
        if !self.repeat_after_mins.is_finite()
            || self.repeat_after_mins <= 0.0
            || self.repeat_after_mins > MAX_REPEAT_AFTER_MINS
        {
            return Err(format!(
                "repeat_after_mins must be in (0, {MAX_REPEAT_AFTER_MINS}], got {}",
                self.repeat_after_mins
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(String::from("request_timeout_secs must be at least 1"));
        }
        self.base_url()
            .map_err(|e| format!("api_base_url {:?}: {e}", self.api_base_url))?;
        Ok(())
    }

    /// Upstream API root, with a trailing slash so relative paths join under it.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base_url` is not an absolute URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        if self.api_base_url.ends_with('/') {
            Url::parse(&self.api_base_url)
        } else {
            Url::parse(&format!("{}/", self.api_base_url))
        }
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Region to resolve.
    #[must_use]
    pub fn region(&self) -> Region {
        Region {
            state_name: self.state_name.clone(),
            district_name: self.district_name.clone(),
        }
    }

    /// Polling loop settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `repeat_after_mins` is not a representable duration.
    pub fn to_settings(&self) -> Result<WatchSettings, TryFromFloatSecsError> {
        Ok(WatchSettings {
            weeks_to_check: self.weeks_to_check,
            repeat_after: Duration::try_from_secs_f64(self.repeat_after_mins * 60.0)?,
            filter: FilterConfig::new(self.min_age, &self.address_contains),
        })
    }

    /// Media player for the configured sounds.
    #[must_use]
    pub fn player(&self) -> MediaPlayer {
        MediaPlayer::new(
            self.player_command.clone(),
            self.alert_sound.clone(),
            self.error_sound.clone(),
        )
    }
}
