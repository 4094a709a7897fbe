//! Orchestration: optional fetch, then a single field lookup.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    cache::CacheStore,
    config::{self, CliCredentials, Config},
    error::WeatherError,
    extract::{self, Query},
    model::Scalar,
    provider::{self, WeatherSource},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Populate the cache from the API.
    Fetch(CliCredentials),
    /// Print one field from the cache.
    Show(Query),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fetched,
    Value(Scalar),
}

/// Whether a cache of the given age should be refreshed under a `minutes` threshold.
/// A missing cache is always stale.
pub fn needs_refresh(age_seconds: Option<f64>, minutes: u64) -> bool {
    match age_seconds {
        Some(age) => age > minutes as f64 * 60.0,
        None => true,
    }
}

#[derive(Debug)]
pub struct App<S> {
    source: S,
    cache: CacheStore,
    config: Option<Config>,
}

impl<S: WeatherSource> App<S> {
    pub fn new(source: S, cache: CacheStore, config: Option<Config>) -> Self {
        Self { source, cache, config }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Run one command. `refresh_minutes` enables the age-gated refresh for lookups;
    /// `None` or `Some(0)` disables it.
    pub async fn run(
        &self,
        command: Command,
        refresh_minutes: Option<u64>,
    ) -> Result<Outcome, WeatherError> {
        self.run_at(command, refresh_minutes, Utc::now()).await
    }

    pub async fn run_at(
        &self,
        command: Command,
        refresh_minutes: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Outcome, WeatherError> {
        match command {
            Command::Fetch(cli) => {
                let credentials = config::resolve_fetch_credentials(&cli, self.config.as_ref())?;
                provider::fetch(&self.source, &credentials, &self.cache).await?;
                Ok(Outcome::Fetched)
            }
            Command::Show(query) => {
                if let Some(minutes) = refresh_minutes.filter(|m| *m > 0) {
                    self.refresh_if_stale(minutes, now).await?;
                }

                let doc = self.cache.read()?;
                debug!(?query, "Reading field from cache");
                extract::extract(&doc, query).map(Outcome::Value)
            }
        }
    }

    async fn refresh_if_stale(&self, minutes: u64, now: DateTime<Utc>) -> Result<(), WeatherError> {
        let Some(credentials) = config::resolve_refresh_credentials(self.config.as_ref()) else {
            warn!("Config file required to use --fetch");
            return Ok(());
        };

        let age = self.cache.age_seconds(now).ok();
        if needs_refresh(age, minutes) {
            info!("Updating cache file");
            provider::fetch(&self.source, &credentials, &self.cache).await
        } else {
            let age_minutes = age.map_or(0, |a| (a / 60.0) as u64);
            info!("Cache file {age_minutes} minutes old. Not updating");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::CurrentField, model::Credentials};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const FRESH: &str = r#"{"current_observation":{"temp_f":80.4}}"#;
    const STALE: &str = r#"{"current_observation":{"temp_f":60.6}}"#;

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherSource for CountingSource {
        async fn fetch_raw(&self, _credentials: &Credentials) -> Result<String, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FRESH.to_string())
        }
    }

    fn config() -> Config {
        Config::from_ini_str("[WUNDER]\napikey = K\nlocation = Boston\n").unwrap()
    }

    fn app(config: Option<Config>) -> (TempDir, App<CountingSource>) {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().join(CacheStore::FILE_NAME));
        (dir, App::new(CountingSource::default(), cache, config))
    }

    fn temp_f() -> Command {
        Command::Show(Query::Current(CurrentField::TempF))
    }

    #[test]
    fn refresh_boundary_is_strict() {
        assert!(!needs_refresh(Some(600.0), 10));
        assert!(needs_refresh(Some(600.001), 10));
        assert!(!needs_refresh(Some(0.0), 1));
        assert!(needs_refresh(None, 10));
    }

    #[test]
    fn huge_threshold_never_refreshes_an_existing_cache() {
        assert!(!needs_refresh(Some(1.0), u64::MAX));
        assert!(!needs_refresh(Some(1e12), u64::MAX / 60 + 1));
        assert!(needs_refresh(None, u64::MAX));
    }

    #[tokio::test]
    async fn absent_cache_without_refresh_is_not_found() {
        let (_dir, app) = app(Some(config()));

        let err = app.run(temp_f(), None).await.unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert_eq!(app.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn show_reads_cached_value() {
        let (_dir, app) = app(None);
        app.cache().write(STALE).unwrap();

        let out = app.run(temp_f(), None).await.unwrap();
        assert_eq!(out, Outcome::Value(Scalar::Int(61)));
    }

    #[tokio::test]
    async fn stale_cache_is_refreshed_before_reading() {
        let (_dir, app) = app(Some(config()));
        app.cache().write(STALE).unwrap();
        let now = app.cache().modified().unwrap() + Duration::minutes(11);

        let out = app.run_at(temp_f(), Some(10), now).await.unwrap();

        assert_eq!(out, Outcome::Value(Scalar::Int(80)));
        assert_eq!(app.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_exactly_at_threshold_is_not_refreshed() {
        let (_dir, app) = app(Some(config()));
        app.cache().write(STALE).unwrap();
        let now = app.cache().modified().unwrap() + Duration::minutes(10);

        let out = app.run_at(temp_f(), Some(10), now).await.unwrap();

        assert_eq!(out, Outcome::Value(Scalar::Int(61)));
        assert_eq!(app.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_minutes_disables_refresh() {
        let (_dir, app) = app(Some(config()));
        app.cache().write(STALE).unwrap();
        let now = app.cache().modified().unwrap() + Duration::days(1);

        app.run_at(temp_f(), Some(0), now).await.unwrap();

        assert_eq!(app.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_without_config_is_skipped() {
        let (_dir, app) = app(None);
        app.cache().write(STALE).unwrap();
        let now = app.cache().modified().unwrap() + Duration::days(1);

        let out = app.run_at(temp_f(), Some(5), now).await.unwrap();

        assert_eq!(out, Outcome::Value(Scalar::Int(61)));
        assert_eq!(app.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_populates_missing_cache() {
        let (_dir, app) = app(Some(config()));

        let out = app.run(temp_f(), Some(5)).await.unwrap();

        assert_eq!(out, Outcome::Value(Scalar::Int(80)));
    }

    #[tokio::test]
    async fn fetch_without_credentials_is_config_missing() {
        let (_dir, app) = app(Some(Config::from_ini_str("[WUNDER]\napikey = K\nlocation =\n").unwrap()));

        let err = app.run(Command::Fetch(CliCredentials::default()), None).await.unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(!app.cache().exists());
    }

    #[tokio::test]
    async fn fetch_ignores_refresh_threshold() {
        let (_dir, app) = app(None);
        let cli = CliCredentials {
            api_key: Some("K".into()),
            location: Some("Boston".into()),
            language: None,
        };

        let out = app.run(Command::Fetch(cli), Some(60)).await.unwrap();

        assert_eq!(out, Outcome::Fetched);
        assert_eq!(app.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.cache().read_raw().unwrap(), FRESH);
    }
}
