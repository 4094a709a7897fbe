use anyhow::{Context, Result, anyhow};
use directories::BaseDirs;
use ini::Ini;
use std::path::{Path, PathBuf};

use crate::{error::WeatherError, model::Credentials};

/// How the config file is named in user-facing messages.
pub const CONFIG_DISPLAY_PATH: &str = "~/.wunder.conf";

/// Credentials stored in the INI dotfile.
///
/// Example:
/// ```ini
/// [WUNDER]
/// apikey = 0123456789abcdef
/// location = CA/San_Francisco
/// language = FR
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub apikey: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
}

impl Config {
    pub const SECTION: &'static str = "WUNDER";
    pub const FILE_NAME: &'static str = ".wunder.conf";

    /// Path to the config file in the user's home directory.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = BaseDirs::new().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(dirs.home_dir().join(Self::FILE_NAME))
    }

    /// Load the config from the default location. `None` when no file exists.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_ini_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Some(cfg))
    }

    pub fn from_ini_str(contents: &str) -> Result<Self> {
        let ini = Ini::load_from_str(contents)?;

        let Some(section) = ini.section(Some(Self::SECTION)) else {
            return Ok(Self::default());
        };

        // Option names are case-insensitive; the section name is not.
        let value = |key: &str| {
            section
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.trim().to_string())
        };

        Ok(Self {
            apikey: value("apikey"),
            location: value("location"),
            language: value("language"),
        })
    }

    /// Credentials usable as a fallback: api key and location must both be non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let api_key = self.apikey.as_deref().filter(|s| !s.is_empty())?;
        let location = self.location.as_deref().filter(|s| !s.is_empty())?;

        Some(Credentials::new(api_key.to_string(), location.to_string(), self.language.clone()))
    }
}

/// Credentials given as positional arguments to `fetch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliCredentials {
    pub api_key: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
}

/// Credentials for an explicit `fetch`.
///
/// Command-line values win only when both api key and location are given; otherwise the
/// config file supplies all three fields.
pub fn resolve_fetch_credentials(
    cli: &CliCredentials,
    config: Option<&Config>,
) -> Result<Credentials, WeatherError> {
    if let (Some(api_key), Some(location)) = (&cli.api_key, &cli.location) {
        return Ok(Credentials::new(api_key.clone(), location.clone(), cli.language.clone()));
    }

    tracing::info!("API key and location not found in arguments, trying {CONFIG_DISPLAY_PATH}");

    resolve_refresh_credentials(config)
        .ok_or_else(|| WeatherError::ConfigMissing(CONFIG_DISPLAY_PATH.to_string()))
}

/// Credentials for the age-gated refresh, which only ever reads the config file.
pub fn resolve_refresh_credentials(config: Option<&Config>) -> Option<Credentials> {
    config.and_then(Config::credentials)
}
