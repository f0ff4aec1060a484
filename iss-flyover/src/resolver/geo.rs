use iss_common::{Coordinates, Stage};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FlyoverError, Result};
use crate::fetcher::Fetcher;

/// Fields are kept loosely typed so the `success`/`ip` check runs before
/// anything else about the body is judged.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    success: Option<Value>,
    ip: Option<Value>,
    /// Present when `success` is false, e.g. "Invalid IP address"
    message: Option<Value>,
    latitude: Option<Value>,
    longitude: Option<Value>,
}

fn degrees(value: Option<&Value>, field: &str) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Err(FlyoverError::malformed(
            Stage::Geolocation,
            format!("missing field `{}`", field),
        )),
        Some(v) => v.as_f64().ok_or_else(|| {
            FlyoverError::malformed(
                Stage::Geolocation,
                format!("field `{}` is not a number: {}", field, v),
            )
        }),
    }
}

pub fn geolocation_url(base: &str, ip: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), ip)
}

/// Validate a geolocation response for `ip` and extract its coordinates.
///
/// The lookup only counts when the service reports `success: true` and echoes
/// back the same IP that was asked for.
pub fn parse_coordinates(body: &str, ip: &str) -> Result<Coordinates> {
    let parsed: GeoResponse = serde_json::from_str(body)
        .map_err(|e| FlyoverError::malformed(Stage::Geolocation, e.to_string()))?;

    let succeeded = parsed.success.as_ref().and_then(Value::as_bool) == Some(true);
    let same_ip = parsed.ip.as_ref().and_then(Value::as_str) == Some(ip);
    if !succeeded || !same_ip {
        return Err(FlyoverError::GeolocationLookup {
            ip: ip.to_string(),
            message: parsed
                .message
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let latitude = degrees(parsed.latitude.as_ref(), "latitude")?;
    let longitude = degrees(parsed.longitude.as_ref(), "longitude")?;

    Ok(Coordinates::from_degrees(latitude, longitude))
}

/// Look up the coordinates of `ip`.
pub async fn fetch_coords_by_ip(fetcher: &dyn Fetcher, base: &str, ip: &str) -> Result<Coordinates> {
    let url = geolocation_url(base, ip);
    let body = fetcher.fetch(&url).await?;
    let coordinates = parse_coordinates(&body, ip)?;
    tracing::debug!("Coordinates for {}: {}", ip, coordinates);
    Ok(coordinates)
}
