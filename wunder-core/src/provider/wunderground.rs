use async_trait::async_trait;
use reqwest::Client;

use crate::{error::WeatherError, model::Credentials};

use super::WeatherSource;

#[derive(Debug, Clone)]
pub struct WundergroundSource {
    base_url: String,
    http: Client,
}

impl WundergroundSource {
    pub const DEFAULT_BASE_URL: &'static str = "http://api.wunderground.com/api";

    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Point the source at another host, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Conditions plus 10-day forecast for one location.
    pub fn request_url(&self, credentials: &Credentials) -> String {
        format!(
            "{}/{}/conditions/forecast10day/lang:{}/q/{}.json",
            self.base_url,
            credentials.api_key,
            credentials.language,
            encode_location(&credentials.location),
        )
    }
}

impl Default for WundergroundSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encode a location, keeping `/` so `CA/San_Francisco` stays two segments.
fn encode_location(location: &str) -> String {
    location
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl WeatherSource for WundergroundSource {
    async fn fetch_raw(&self, credentials: &Credentials) -> Result<String, WeatherError> {
        let url = self.request_url(credentials);
        tracing::debug!(location = %credentials.location, lang = %credentials.language, "Fetching weather data...");

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Network(format!("Status returned: {status}")));
        }

        Ok(res.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_follows_conditions_forecast_template() {
        let source = WundergroundSource::new();
        let creds = Credentials::new("KEY".into(), "CA/San Francisco".into(), None);

        assert_eq!(
            source.request_url(&creds),
            "http://api.wunderground.com/api/KEY/conditions/forecast10day/lang:EN/q/CA/San%20Francisco.json"
        );
    }

    #[test]
    fn location_is_percent_encoded() {
        assert_eq!(encode_location("Zürich"), "Z%C3%BCrich");
        assert_eq!(encode_location("St. Louis, MO"), "St.%20Louis%2C%20MO");
        assert_eq!(encode_location("02108"), "02108");
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let source = WundergroundSource::with_base_url("http://localhost:9999/api/");
        let creds = Credentials::new("K".into(), "Oslo".into(), Some("NO".into()));

        assert_eq!(
            source.request_url(&creds),
            "http://localhost:9999/api/K/conditions/forecast10day/lang:NO/q/Oslo.json"
        );
    }
}
