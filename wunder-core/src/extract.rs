//! Projections from a cached [`WeatherDocument`] to a single printable value.

use crate::{
    error::WeatherError,
    field::{CurrentField, ForecastField, InfoField},
    icon,
    model::{CurrentObservation, ForecastDay, Scalar, WeatherDocument},
};

/// What the caller wants printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Current(CurrentField),
    Forecast { field: ForecastField, day: usize },
    Info(InfoField),
}

pub fn extract(doc: &WeatherDocument, query: Query) -> Result<Scalar, WeatherError> {
    match query {
        Query::Current(field) => current(doc, field),
        Query::Forecast { field, day } => forecast(doc, field, day),
        Query::Info(field) => info(doc, field),
    }
}

fn require<'a, T>(value: &'a Option<T>, key: &str) -> Result<&'a T, WeatherError> {
    value.as_ref().ok_or_else(|| WeatherError::missing(key))
}

fn passthrough(value: &Option<Scalar>, key: &str) -> Result<Scalar, WeatherError> {
    require(value, key).cloned()
}

fn rounded(value: &Option<Scalar>, key: &str) -> Result<i64, WeatherError> {
    require(value, key)?
        .rounded()
        .ok_or_else(|| WeatherError::missing(format!("{key} (not a number)")))
}

fn observation(doc: &WeatherDocument) -> Result<&CurrentObservation, WeatherError> {
    require(&doc.current_observation, "current_observation")
}

pub fn current(doc: &WeatherDocument, field: CurrentField) -> Result<Scalar, WeatherError> {
    let obs = observation(doc)?;

    let value = match field {
        CurrentField::Condition => passthrough(&obs.weather, "weather")?,
        CurrentField::TempF => Scalar::Int(rounded(&obs.temp_f, "temp_f")?),
        CurrentField::TempC => Scalar::Int(rounded(&obs.temp_c, "temp_c")?),
        CurrentField::Humidity => passthrough(&obs.relative_humidity, "relative_humidity")?,
        CurrentField::Icon => {
            let condition = require(&obs.icon, "icon")?;
            let stamp = require(&obs.local_time_rfc822, "local_time_rfc822")?;
            let hour = icon::local_hour(stamp)
                .ok_or_else(|| WeatherError::missing("local_time_rfc822 (no hour)"))?;
            Scalar::from(icon::icon_code(&condition.to_string(), hour, true))
        }
        CurrentField::Wind => {
            let dir = require(&obs.wind_dir, "wind_dir")?;
            let mph = rounded(&obs.wind_mph, "wind_mph")?;
            Scalar::Text(format!("{dir} {mph}mph"))
        }
        CurrentField::PressureMb => passthrough(&obs.pressure_mb, "pressure_mb")?,
        CurrentField::PressureIn => passthrough(&obs.pressure_in, "pressure_in")?,
        CurrentField::DewpointC => passthrough(&obs.dewpoint_c, "dewpoint_c")?,
        CurrentField::DewpointF => passthrough(&obs.dewpoint_f, "dewpoint_f")?,
        CurrentField::HeatIndexC => passthrough(&obs.heat_index_c, "heat_index_c")?,
        CurrentField::HeatIndexF => passthrough(&obs.heat_index_f, "heat_index_f")?,
        CurrentField::WindchillC => passthrough(&obs.windchill_c, "windchill_c")?,
        CurrentField::WindchillF => passthrough(&obs.windchill_f, "windchill_f")?,
        CurrentField::FeelslikeC => passthrough(&obs.feelslike_c, "feelslike_c")?,
        CurrentField::FeelslikeF => passthrough(&obs.feelslike_f, "feelslike_f")?,
        CurrentField::VisibilityMi => passthrough(&obs.visibility_mi, "visibility_mi")?,
        CurrentField::VisibilityKm => passthrough(&obs.visibility_km, "visibility_km")?,
        CurrentField::PrecHourIn => passthrough(&obs.precip_1hr_in, "precip_1hr_in")?,
        CurrentField::PrecHourCm => passthrough(&obs.precip_1hr_metric, "precip_1hr_metric")?,
        CurrentField::PrecDayIn => passthrough(&obs.precip_today_in, "precip_today_in")?,
        CurrentField::PrecDayCm => passthrough(&obs.precip_today_metric, "precip_today_metric")?,
    };

    Ok(value)
}

fn forecast_day(doc: &WeatherDocument, day: usize) -> Result<&ForecastDay, WeatherError> {
    let days = require(&doc.forecast, "forecast")
        .and_then(|f| require(&f.simpleforecast, "forecast.simpleforecast"))
        .and_then(|s| require(&s.forecastday, "forecast.simpleforecast.forecastday"))?;

    days.get(day)
        .ok_or_else(|| WeatherError::missing(format!("forecastday[{day}]")))
}

pub fn forecast(
    doc: &WeatherDocument,
    field: ForecastField,
    day: usize,
) -> Result<Scalar, WeatherError> {
    let node = forecast_day(doc, day)?;

    let value = match field {
        ForecastField::Day => passthrough(&require(&node.date, "date")?.weekday, "date.weekday")?,
        ForecastField::ShortDate => {
            let date = require(&node.date, "date")?;
            let month = require(&date.month, "date.month")?;
            let dom = require(&date.day, "date.day")?;
            let year = require(&date.year, "date.year")?;
            Scalar::Text(format!("{month}/{dom}/{year}"))
        }
        ForecastField::LongDate => {
            let date = require(&node.date, "date")?;
            let name = require(&date.monthname, "date.monthname")?;
            let dom = require(&date.day, "date.day")?;
            let year = require(&date.year, "date.year")?;
            Scalar::Text(format!("{name} {dom}, {year}"))
        }
        ForecastField::LowF => passthrough(&require(&node.low, "low")?.fahrenheit, "low.fahrenheit")?,
        ForecastField::LowC => passthrough(&require(&node.low, "low")?.celsius, "low.celsius")?,
        ForecastField::HighF => {
            passthrough(&require(&node.high, "high")?.fahrenheit, "high.fahrenheit")?
        }
        ForecastField::HighC => passthrough(&require(&node.high, "high")?.celsius, "high.celsius")?,
        ForecastField::Icon => {
            // Forecast days never switch to the night table, so the hour is irrelevant.
            let condition = require(&node.icon, "icon")?;
            Scalar::from(icon::icon_code(&condition.to_string(), 12, false))
        }
        ForecastField::Condition => passthrough(&node.conditions, "conditions")?,
        ForecastField::RainIn => {
            passthrough(&require(&node.qpf_allday, "qpf_allday")?.inches, "qpf_allday.in")?
        }
        ForecastField::RainMm => {
            passthrough(&require(&node.qpf_allday, "qpf_allday")?.mm, "qpf_allday.mm")?
        }
        ForecastField::SnowIn => {
            passthrough(&require(&node.snow_allday, "snow_allday")?.inches, "snow_allday.in")?
        }
        ForecastField::SnowCm => {
            passthrough(&require(&node.snow_allday, "snow_allday")?.cm, "snow_allday.cm")?
        }
    };

    Ok(value)
}

pub fn info(doc: &WeatherDocument, field: InfoField) -> Result<Scalar, WeatherError> {
    let obs = observation(doc)?;
    let display = || require(&obs.display_location, "display_location");

    match field {
        InfoField::City => passthrough(&display()?.city, "display_location.city"),
        InfoField::Postal => passthrough(&display()?.zip, "display_location.zip"),
        InfoField::DateTime => passthrough(&obs.observation_time, "observation_time"),
        InfoField::Location => passthrough(&display()?.full, "display_location.full"),
        InfoField::Country => passthrough(&display()?.country, "display_location.country"),
        InfoField::Latitude => passthrough(&display()?.latitude, "display_location.latitude"),
        InfoField::Longitude => passthrough(&display()?.longitude, "display_location.longitude"),
        InfoField::Elevation => passthrough(&display()?.elevation, "display_location.elevation"),
        InfoField::Observation => passthrough(
            &require(&obs.observation_location, "observation_location")?.full,
            "observation_location.full",
        ),
    }
}
