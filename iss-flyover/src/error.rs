use iss_common::Stage;
use thiserror::Error;

/// Every way a single pipeline run can fail.
///
/// Resolvers return these unchanged and the pipeline forwards the first one
/// it sees, so the variant always names the stage that actually failed.
#[derive(Debug, Error)]
pub enum FlyoverError {
    #[error("Network error when requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Status Code {status} when requesting {url}. Response: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Malformed {stage} response: {reason}")]
    MalformedResponse { stage: Stage, reason: String },
    #[error("Geolocation lookup failed for IP {ip}: {}", .message.as_deref().unwrap_or("no message from server"))]
    GeolocationLookup { ip: String, message: Option<String> },
}

impl FlyoverError {
    pub fn malformed(stage: Stage, reason: impl Into<String>) -> Self {
        FlyoverError::MalformedResponse {
            stage,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlyoverError>;
