//! Names of the fields each category can print.

use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {category} field '{name}'")]
pub struct UnknownField {
    pub category: &'static str,
    pub name: String,
}

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident, $category:literal { $($variant:ident => $text:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownField { category: $category, name: s.to_string() }),
                }
            }
        }
    };
}

field_enum! {
    /// Fields of the `current` category.
    CurrentField, "current" {
        Condition => "condition",
        TempF => "temp_f",
        TempC => "temp_c",
        Humidity => "humidity",
        Icon => "icon",
        Wind => "wind",
        PressureMb => "pressure_mb",
        PressureIn => "pressure_in",
        DewpointC => "dewpoint_c",
        DewpointF => "dewpoint_f",
        HeatIndexC => "heat_index_c",
        HeatIndexF => "heat_index_f",
        WindchillC => "windchill_c",
        WindchillF => "windchill_f",
        FeelslikeC => "feelslike_c",
        FeelslikeF => "feelslike_f",
        VisibilityMi => "visibility_mi",
        VisibilityKm => "visibility_km",
        PrecHourIn => "prec_hour_in",
        PrecHourCm => "prec_hour_cm",
        PrecDayIn => "prec_day_in",
        PrecDayCm => "prec_day_cm",
    }
}

field_enum! {
    /// Fields of the `forecast` category.
    ForecastField, "forecast" {
        Day => "day",
        ShortDate => "shortdate",
        LongDate => "longdate",
        LowF => "low_f",
        LowC => "low_c",
        HighF => "high_f",
        HighC => "high_c",
        Icon => "icon",
        Condition => "condition",
        RainIn => "rain_in",
        RainMm => "rain_mm",
        SnowIn => "snow_in",
        SnowCm => "snow_cm",
    }
}

field_enum! {
    /// Fields of the `info` category.
    InfoField, "info" {
        City => "city",
        Postal => "postal",
        DateTime => "datetime",
        Location => "location",
        Country => "country",
        Latitude => "latitude",
        Longitude => "longitude",
        Elevation => "elevation",
        Observation => "observation",
    }
}

/// Number of forecast days the API returns; valid day indices are `0..FORECAST_DAYS`.
pub const FORECAST_DAYS: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_parse_back() {
        for field in CurrentField::all() {
            assert_eq!(field.as_str().parse::<CurrentField>(), Ok(*field));
        }
        for field in ForecastField::all() {
            assert_eq!(field.as_str().parse::<ForecastField>(), Ok(*field));
        }
        for field in InfoField::all() {
            assert_eq!(field.as_str().parse::<InfoField>(), Ok(*field));
        }
    }

    #[test]
    fn category_sizes() {
        assert_eq!(CurrentField::all().len(), 22);
        assert_eq!(ForecastField::all().len(), 13);
        assert_eq!(InfoField::all().len(), 9);
    }

    #[test]
    fn unknown_field_names_the_category() {
        let err = "dewpoint".parse::<InfoField>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown info field 'dewpoint'");
    }
}
