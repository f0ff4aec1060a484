use iss_common::Stage;
use serde::Deserialize;

use crate::error::{FlyoverError, Result};
use crate::fetcher::Fetcher;

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: Option<String>,
}

/// Extract the `ip` field from an IP echo response.
pub fn parse_ip(body: &str) -> Result<String> {
    let parsed: IpResponse = serde_json::from_str(body)
        .map_err(|e| FlyoverError::malformed(Stage::IpLookup, e.to_string()))?;

    match parsed.ip {
        Some(ip) if !ip.is_empty() => Ok(ip),
        _ => Err(FlyoverError::malformed(Stage::IpLookup, "missing field `ip`")),
    }
}

/// Ask the IP echo service for the caller's public address.
pub async fn fetch_my_ip(fetcher: &dyn Fetcher, endpoint: &str) -> Result<String> {
    let body = fetcher.fetch(endpoint).await?;
    let ip = parse_ip(&body)?;
    tracing::debug!("Public IP resolved: {}", ip);
    Ok(ip)
}
