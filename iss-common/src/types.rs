use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Digits kept after the decimal point when coordinates are formatted.
pub const COORDINATE_PRECISION: usize = 5;

/// Pipeline stage, used to attribute errors and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    IpLookup,
    Geolocation,
    Flyover,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::IpLookup => "ip_lookup",
            Stage::Geolocation => "geolocation",
            Stage::Flyover => "flyover",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latitude/longitude pair, already rendered as fixed-point strings.
///
/// Values are kept as text so the flyover request receives exactly
/// the digits that were produced by the geolocation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    /// Build coordinates from degrees, formatting both values with
    /// [`COORDINATE_PRECISION`] fractional digits.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: format!("{:.*}", COORDINATE_PRECISION, latitude),
            longitude: format!("{:.*}", COORDINATE_PRECISION, longitude),
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One predicted ISS pass over a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyoverPass {
    /// Unix timestamp (seconds) at which the station rises above the horizon
    pub risetime: i64,
    /// Visible duration in seconds
    pub duration: u64,
}

impl FlyoverPass {
    pub fn rise_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.risetime, 0)
    }

    /// Render the human-readable pass line in the given time zone.
    pub fn describe<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let when = match self.rise_time() {
            Some(utc) => utc
                .with_timezone(tz)
                .format("%a %b %d %Y %H:%M:%S %Z")
                .to_string(),
            None => self.risetime.to_string(),
        };
        format!("Next pass at {} for {} seconds", when, self.duration)
    }
}
