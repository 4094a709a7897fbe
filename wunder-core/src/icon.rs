//! Condition-code to icon-letter mapping.
//!
//! Letters index into a weather icon font. Night variants of the sun and cloud
//! states are uppercase; rain, storm and fog states share one letter.

use regex::Regex;
use std::sync::LazyLock;

static LOCAL_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+ \d+ (.+):\d+:\d+").expect("hour pattern is valid"));

const DAY_ICONS: &[(&str, &str)] = &[
    ("chancerain", "g"),
    ("sunny", "a"),
    ("mostlysunny", "b"),
    ("partlycloudy", "c"),
    ("mostlycloudy", "d"),
    ("rain", "i"),
    ("chancesnow", "o"),
    ("cloudy", "e"),
    ("tstorms", "m"),
    ("chancetstorms", "k"),
    ("sleet", "q"),
    ("snow", "q"),
    ("fog", "e"),
    ("smoke", "e"),
    ("hazy", "e"),
    ("flurries", "p"),
    ("chanceflurries", "o"),
    ("chancesleet", "o"),
    ("clear", "a"),
    ("partlysunny", "c"),
];

const NIGHT_ICONS: &[(&str, &str)] = &[
    ("chancerain", "G"),
    ("sunny", "A"),
    ("mostlysunny", "B"),
    ("partlycloudy", "C"),
    ("mostlycloudy", "D"),
    ("rain", "i"),
    ("chancesnow", "O"),
    ("cloudy", "e"),
    ("tstorms", "m"),
    ("chancetstorms", "K"),
    ("sleet", "q"),
    ("snow", "q"),
    ("fog", "e"),
    ("smoke", "e"),
    ("haze", "e"),
    ("flurries", "p"),
    ("chanceflurries", "o"),
    ("chancesleet", "o"),
    ("clear", "A"),
    ("partlysunny", "C"),
];

/// Extract the local hour from a `local_time_rfc822` string such as
/// `Sat, 15 Oct 2016 22:04:11 -0400`.
pub fn local_hour(rfc822: &str) -> Option<u32> {
    LOCAL_HOUR
        .captures(rfc822)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().trim().parse().ok())
}

pub fn is_night(hour: u32) -> bool {
    hour > 20 || hour < 6
}

/// Map a condition code to its icon letter.
///
/// Only current conditions switch to the night table; forecast days always use
/// the day table. Unknown codes map to an empty string.
pub fn icon_code(condition: &str, hour: u32, is_current: bool) -> &'static str {
    let table = if is_current && is_night(hour) { NIGHT_ICONS } else { DAY_ICONS };

    match table.iter().find(|(code, _)| *code == condition) {
        Some((_, letter)) => *letter,
        None => {
            tracing::warn!(condition, "Icon type doesn't exist. Please report this.");
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hour_before_minutes_and_seconds() {
        assert_eq!(local_hour("Sat, 15 Oct 2016 22:04:11 -0400"), Some(22));
        assert_eq!(local_hour("Mon, 03 Jul 2017 06:00:00 +0200"), Some(6));
        assert_eq!(local_hour("Mon, 03 Jul 2017 00:59:59 +0000"), Some(0));
    }

    #[test]
    fn unparseable_timestamp_has_no_hour() {
        assert_eq!(local_hour(""), None);
        assert_eq!(local_hour("yesterday evening"), None);
    }

    #[test]
    fn night_window_is_exclusive_of_six_and_twenty() {
        assert!(is_night(21));
        assert!(is_night(5));
        assert!(is_night(0));
        assert!(!is_night(20));
        assert!(!is_night(6));
        assert!(!is_night(12));
    }

    #[test]
    fn current_conditions_use_night_table_after_dark() {
        assert_eq!(icon_code("sunny", 22, true), "A");
        assert_eq!(icon_code("sunny", 12, true), "a");
        assert_eq!(icon_code("chancetstorms", 3, true), "K");
        assert_eq!(icon_code("rain", 3, true), "i");
    }

    #[test]
    fn forecast_days_always_use_day_table() {
        assert_eq!(icon_code("sunny", 22, false), "a");
        assert_eq!(icon_code("partlycloudy", 2, false), "c");
    }

    #[test]
    fn unknown_conditions_map_to_empty() {
        assert_eq!(icon_code("volcanicash", 12, true), "");
        // "hazy" only exists in the day table and "haze" only in the night table.
        assert_eq!(icon_code("hazy", 23, true), "");
        assert_eq!(icon_code("haze", 12, true), "");
        assert_eq!(icon_code("haze", 23, true), "e");
    }

    #[test]
    fn tables_have_twenty_entries() {
        assert_eq!(DAY_ICONS.len(), 20);
        assert_eq!(NIGHT_ICONS.len(), 20);
    }
}
