//! Core library for the `wunder` CLI.
//!
//! This crate defines:
//! - Configuration & credentials resolution
//! - The single-file response cache
//! - The weather API source and fetch validation
//! - Typed document model and field extraction (including icon mapping)
//!
//! It is used by `wunder-cli`, but can also be reused by other status-bar frontends.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod icon;
pub mod model;
pub mod provider;

pub use app::{App, Command, Outcome};
pub use cache::CacheStore;
pub use config::{CliCredentials, Config};
pub use error::WeatherError;
pub use extract::Query;
pub use field::{CurrentField, FORECAST_DAYS, ForecastField, InfoField};
pub use model::{Credentials, Scalar, WeatherDocument};
pub use provider::{WeatherSource, WundergroundSource};
