//! Location model and its weather status

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LocationError;

/// City names used for randomly generated locations
pub const RANDOM_CITIES: [&str; 9] = [
    "New York", "Hong Kong", "Kiev", "Moscow", "Helsinki", "Tallin", "Madrid", "Tokyo", "Kyoto",
];

/// Weather condition reported for a location
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Cloudy,
    Sunny,
    MostlySunny,
    PartlySunny,
    PartlySunnyRain,
    ThunderCloudAndRain,
    Tornado,
    BarelySunny,
    Lightening,
    SnowCloud,
    Rainy,
}

/// Display grouping of statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Overcast,
    Severe,
    Fair,
}

impl Status {
    pub const ALL: [Status; 11] = [
        Status::Cloudy,
        Status::Sunny,
        Status::MostlySunny,
        Status::PartlySunny,
        Status::PartlySunnyRain,
        Status::ThunderCloudAndRain,
        Status::Tornado,
        Status::BarelySunny,
        Status::Lightening,
        Status::SnowCloud,
        Status::Rainy,
    ];

    /// Wire code, e.g. `PARTLY_SUNNY_RAIN`
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Status::Cloudy => "CLOUDY",
            Status::Sunny => "SUNNY",
            Status::MostlySunny => "MOSTLY_SUNNY",
            Status::PartlySunny => "PARTLY_SUNNY",
            Status::PartlySunnyRain => "PARTLY_SUNNY_RAIN",
            Status::ThunderCloudAndRain => "THUNDER_CLOUD_AND_RAIN",
            Status::Tornado => "TORNADO",
            Status::BarelySunny => "BARELY_SUNNY",
            Status::Lightening => "LIGHTENING",
            Status::SnowCloud => "SNOW_CLOUD",
            Status::Rainy => "RAINY",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Status::Cloudy => "☁️",
            Status::Sunny => "☀️",
            Status::MostlySunny => "🌤",
            Status::PartlySunny => "🌤",
            Status::PartlySunnyRain => "🌦",
            Status::ThunderCloudAndRain => "⛈",
            Status::Tornado => "🌪",
            Status::BarelySunny => "🌥",
            Status::Lightening => "🌩",
            Status::SnowCloud => "🌨",
            Status::Rainy => "🌧",
        }
    }

    #[must_use]
    pub fn tone(self) -> Tone {
        match self {
            Status::Cloudy | Status::Rainy | Status::SnowCloud => Tone::Overcast,
            Status::Tornado | Status::ThunderCloudAndRain | Status::Lightening => Tone::Severe,
            Status::Sunny
            | Status::MostlySunny
            | Status::PartlySunny
            | Status::BarelySunny
            | Status::PartlySunnyRain => Tone::Fair,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::Overcast => "overcast",
            Tone::Severe => "severe",
            Tone::Fair => "fair",
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Status {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.code() == wanted)
            .ok_or_else(|| LocationError::config(format!("Unknown weather status '{s}'")))
    }
}

/// A named place with its current weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    /// Client-generated identifier, never regenerated
    pub id: String,
    pub name: String,
    pub status: Status,
    /// Temperature in Celsius
    pub temperature: i32,
}

impl Location {
    /// Create a location with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>, status: Status, temperature: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            status,
            temperature,
        }
    }

    /// Random city, status and temperature in `-20..40`
    #[must_use]
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let name = RANDOM_CITIES.choose(&mut rng).copied().unwrap_or("New York");
        let status = Status::ALL.choose(&mut rng).copied().unwrap_or(Status::Sunny);
        let temperature = rng.gen_range(-20..40);
        Self::new(name, status, temperature)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}ºC", self.temperature)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {}",
            self.name,
            self.status.emoji(),
            self.format_temperature()
        )
    }
}

/// Wire wrapper returned by `GET /locations`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct LocationsResponse {
    pub locations: Vec<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Status::Cloudy, "CLOUDY")]
    #[case(Status::MostlySunny, "MOSTLY_SUNNY")]
    #[case(Status::PartlySunnyRain, "PARTLY_SUNNY_RAIN")]
    #[case(Status::ThunderCloudAndRain, "THUNDER_CLOUD_AND_RAIN")]
    #[case(Status::Lightening, "LIGHTENING")]
    #[case(Status::SnowCloud, "SNOW_CLOUD")]
    fn test_status_wire_codes(#[case] status: Status, #[case] code: &str) {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{code}\""));
        assert_eq!(status.code(), code);
    }

    #[test]
    fn test_every_status_parses_from_its_code() {
        for status in Status::ALL {
            assert_eq!(status.code().parse::<Status>().unwrap(), status);
        }
        assert_eq!("partly-sunny".parse::<Status>().unwrap(), Status::PartlySunny);
        assert!("HAIL".parse::<Status>().is_err());
    }

    #[test]
    fn test_location_wire_format() {
        let json = r#"{"id":"abc","name":"Kyoto","status":"BARELY_SUNNY","temperature":-4}"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.id, "abc");
        assert_eq!(location.status, Status::BarelySunny);
        assert_eq!(location.temperature, -4);
        assert_eq!(serde_json::to_string(&location).unwrap(), json);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id":"abc","name":"Kyoto","status":"HAIL","temperature":1}"#;
        assert!(serde_json::from_str::<Location>(json).is_err());
    }

    #[test]
    fn test_locations_response_wrapper() {
        let json = r#"{"locations":[{"id":"1","name":"Madrid","status":"SUNNY","temperature":31}]}"#;
        let response: LocationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.locations.len(), 1);
        assert_eq!(response.locations[0].name, "Madrid");
    }

    #[test]
    fn test_random_location_ranges() {
        for _ in 0..200 {
            let location = Location::random();
            assert!((-20..40).contains(&location.temperature));
            assert!(RANDOM_CITIES.contains(&location.name.as_str()));
            assert!(!location.id.is_empty());
        }
    }

    #[test]
    fn test_new_locations_get_distinct_ids() {
        let a = Location::new("Tokyo", Status::Rainy, 12);
        let b = Location::new("Tokyo", Status::Rainy, 12);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_status_tones() {
        assert_eq!(Status::Rainy.tone(), Tone::Overcast);
        assert_eq!(Status::Lightening.tone(), Tone::Severe);
        assert_eq!(Status::PartlySunnyRain.tone(), Tone::Fair);
        assert_eq!(Status::Tornado.tone().to_string(), "severe");
        assert_eq!(Status::SnowCloud.tone().to_string(), "overcast");
    }

    #[test]
    fn test_location_display_row() {
        let location = Location {
            id: "1".to_string(),
            name: "Helsinki".to_string(),
            status: Status::SnowCloud,
            temperature: -7,
        };
        assert_eq!(location.to_string(), "Helsinki  🌨  -7ºC");
    }
}
