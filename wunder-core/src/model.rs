use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

/// Credentials needed to query the weather API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub location: String,
    pub language: String,
}

impl Credentials {
    pub const DEFAULT_LANGUAGE: &'static str = "EN";

    pub fn new(api_key: String, location: String, language: Option<String>) -> Self {
        Self {
            api_key,
            location,
            language: language.unwrap_or_else(|| Self::DEFAULT_LANGUAGE.to_string()),
        }
    }
}

/// A leaf value from the upstream document, printed the way the status bar expects it.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Scalar::Text(s),
            // Nested values where a leaf was expected are printed as compact JSON.
            other => Scalar::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Scalar::from)
    }
}

/// Read a field without failing the whole document: a value of the wrong shape reads as
/// absent, so only lookups that need it report a missing key. A `null` leaf stays present.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl Scalar {
    /// Numeric view of the value; the upstream API sends some numbers as strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }

    /// Round half to even, the way the status bar consumers have always seen it.
    pub fn rounded(&self) -> Option<i64> {
        self.as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.round_ties_even() as i64)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("None"),
            Scalar::Int(n) => write!(f, "{n}"),
            // Debug keeps the trailing ".0" on whole floats.
            Scalar::Float(n) => write!(f, "{n:?}"),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bool(true) => f.write_str("True"),
            Scalar::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

/// Parsed cache content. Every subtree is optional; absence surfaces as a missing key
/// only when a field that needs it is requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub response: Option<ResponseMeta>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_observation: Option<CurrentObservation>,
    #[serde(default, deserialize_with = "lenient")]
    pub forecast: Option<Forecast>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseError {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<Scalar>,
}

impl ResponseMeta {
    fn error_description(&self) -> Option<&Scalar> {
        self.error.as_ref()?.description.as_ref()
    }
}

impl WeatherDocument {
    /// Error description embedded by the API in an otherwise successful response.
    pub fn api_error(&self) -> Option<&Scalar> {
        self.response.as_ref()?.error_description()
    }
}

/// Just the `response` block of a fresh API body, enough to detect embedded errors
/// without requiring the rest of the body to match the typed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub response: Option<ResponseMeta>,
}

impl ApiEnvelope {
    pub fn api_error(&self) -> Option<&Scalar> {
        self.response.as_ref()?.error_description()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentObservation {
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_f: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_c: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub relative_humidity: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_dir: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_mph: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure_mb: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure_in: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub dewpoint_c: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub dewpoint_f: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub heat_index_c: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub heat_index_f: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub windchill_c: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub windchill_f: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub feelslike_c: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub feelslike_f: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility_mi: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility_km: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub precip_1hr_in: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub precip_1hr_metric: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub precip_today_in: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub precip_today_metric: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub observation_time: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub local_time_rfc822: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_location: Option<DisplayLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub observation_location: Option<ObservationLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub full: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub zip: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub elevation: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub full: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "lenient")]
    pub simpleforecast: Option<SimpleForecast>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleForecast {
    #[serde(default, deserialize_with = "lenient")]
    pub forecastday: Option<Vec<ForecastDay>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastDay {
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<ForecastDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub low: Option<Temperature>,
    #[serde(default, deserialize_with = "lenient")]
    pub high: Option<Temperature>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub conditions: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub qpf_allday: Option<Rainfall>,
    #[serde(default, deserialize_with = "lenient")]
    pub snow_allday: Option<Snowfall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastDate {
    #[serde(default, deserialize_with = "lenient")]
    pub day: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub month: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthname: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub weekday: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Temperature {
    #[serde(default, deserialize_with = "lenient")]
    pub fahrenheit: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub celsius: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rainfall {
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub inches: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub mm: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snowfall {
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub inches: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub cm: Option<Scalar>,
}
