use crate::{
    cache::CacheStore,
    error::WeatherError,
    model::{ApiEnvelope, Credentials},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod wunderground;

pub use wunderground::WundergroundSource;

/// Anything that can return the raw JSON body of a conditions + forecast query.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Perform the request. Transport failures and non-2xx statuses are `Network` errors.
    async fn fetch_raw(&self, credentials: &Credentials) -> Result<String, WeatherError>;
}

/// Fetch fresh data and persist it to the cache.
///
/// A body carrying `response.error.description` is an API error and leaves the cache
/// untouched, as does any network failure.
pub async fn fetch(
    source: &dyn WeatherSource,
    credentials: &Credentials,
    cache: &CacheStore,
) -> Result<(), WeatherError> {
    let body = source.fetch_raw(credentials).await?;

    let envelope: ApiEnvelope = serde_json::from_str(&body)
        .map_err(|e| WeatherError::Network(format!("Response was not valid JSON: {e}")))?;

    if let Some(description) = envelope.api_error() {
        return Err(WeatherError::Api(description.to_string()));
    }

    cache.write(&body)?;
    tracing::info!(path = %cache.path().display(), "Data fetched successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct CannedSource {
        body: Result<String, String>,
        seen: Mutex<Vec<Credentials>>,
    }

    impl CannedSource {
        fn ok(body: &str) -> Self {
            Self { body: Ok(body.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn failing(reason: &str) -> Self {
            Self { body: Err(reason.to_string()), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl WeatherSource for CannedSource {
        async fn fetch_raw(&self, credentials: &Credentials) -> Result<String, WeatherError> {
            self.seen.lock().unwrap().push(credentials.clone());
            self.body.clone().map_err(WeatherError::Network)
        }
    }

    fn setup() -> (TempDir, CacheStore, Credentials) {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().join(CacheStore::FILE_NAME));
        let creds = Credentials::new("KEY".into(), "Boston".into(), None);
        (dir, cache, creds)
    }

    #[tokio::test]
    async fn success_writes_raw_body() {
        let (_dir, cache, creds) = setup();
        let body = r#"{"response":{"version":"0.1"},"current_observation":{"temp_f":70}}"#;
        let source = CannedSource::ok(body);

        fetch(&source, &creds, &cache).await.unwrap();

        assert_eq!(cache.read_raw().unwrap(), body);
        assert_eq!(source.seen.lock().unwrap().as_slice(), &[creds]);
    }

    #[tokio::test]
    async fn embedded_error_is_api_error_and_cache_untouched() {
        let (_dir, cache, creds) = setup();
        let source = CannedSource::ok(r#"{"response":{"error":{"description":"Invalid API key"}}}"#);

        let err = fetch(&source, &creds, &cache).await.unwrap_err();

        assert!(matches!(&err, WeatherError::Api(d) if d == "Invalid API key"));
        assert_eq!(err.exit_code(), 3);
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn network_failure_keeps_previous_cache() {
        let (_dir, cache, creds) = setup();
        cache.write(r#"{"old":true}"#).unwrap();

        let err = fetch(&CannedSource::failing("connection refused"), &creds, &cache)
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert_eq!(cache.read_raw().unwrap(), r#"{"old":true}"#);
    }

    #[tokio::test]
    async fn non_json_body_is_a_network_error() {
        let (_dir, cache, creds) = setup();

        let err = fetch(&CannedSource::ok("<html>502</html>"), &creds, &cache)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert!(!cache.exists());
    }
}
