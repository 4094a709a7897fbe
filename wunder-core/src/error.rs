//! Error taxonomy shared by every component.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Neither the command line nor the config file supplied usable credentials.
    #[error("Please provide an API key and location in {0}")]
    ConfigMissing(String),

    /// The cache file is absent or unreadable.
    #[error("Data file has not been populated. Use 'wunder -v fetch <apikey> <location>' first.")]
    CacheNotFound(#[source] std::io::Error),

    /// The cached document lacks a key needed by the requested field.
    #[error("Data file has not been populated (missing key: {0}). Use 'wunder -v fetch <apikey> <location>' first.")]
    MissingKey(String),

    #[error("Failed to write cache file {path}: {source}")]
    CacheWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure, non-2xx status, or an unreadable body.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered but embedded an error description in the body.
    #[error("{0}")]
    Api(String),
}

impl WeatherError {
    /// Process exit code for scripting consumers.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CacheNotFound(_) | Self::MissingKey(_) | Self::CacheWrite { .. } => 1,
            Self::Network(_) => 2,
            Self::Api(_) => 3,
            Self::ConfigMissing(_) => 4,
        }
    }

    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Network(format!("Status returned: {status}")),
            None => Self::Network(err.to_string()),
        }
    }
}
