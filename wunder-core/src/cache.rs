use chrono::{DateTime, Utc};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::{error::WeatherError, model::WeatherDocument};

/// Single-file JSON cache holding the last successful API response verbatim.
///
/// There is no locking: concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub const FILE_NAME: &'static str = "wunder.cache.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the shared cache file in the system temp directory.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(Self::FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn modified(&self) -> io::Result<DateTime<Utc>> {
        let modified = fs::metadata(&self.path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    /// Seconds elapsed between the last write and `now`. Fails if the file is absent.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> io::Result<f64> {
        let modified = self.modified()?;
        Ok((now - modified).num_milliseconds() as f64 / 1000.0)
    }

    pub fn read_raw(&self) -> Result<String, WeatherError> {
        fs::read_to_string(&self.path).map_err(WeatherError::CacheNotFound)
    }

    /// Read and parse the cached document.
    pub fn read(&self) -> Result<WeatherDocument, WeatherError> {
        let raw = self.read_raw()?;
        serde_json::from_str(&raw).map_err(|e| {
            WeatherError::CacheNotFound(io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    /// Replace the cache contents. The body lands in a sibling temp file first and is
    /// renamed into place, so readers never observe a partial document.
    pub fn write(&self, raw: &str) -> Result<(), WeatherError> {
        let write_err = |source: io::Error| WeatherError::CacheWrite {
            path: self.path.display().to_string(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(raw.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
