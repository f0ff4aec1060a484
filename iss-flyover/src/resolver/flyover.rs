use iss_common::{Coordinates, FlyoverPass, Stage};
use serde::Deserialize;

use crate::error::{FlyoverError, Result};
use crate::fetcher::Fetcher;

#[derive(Debug, Deserialize)]
struct FlyoverResponse {
    response: Option<Vec<FlyoverPass>>,
}

pub fn flyover_url(base: &str, coordinates: &Coordinates) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}lat={}&lon={}",
        base, separator, coordinates.latitude, coordinates.longitude
    )
}

/// Extract the `response` array. Passes keep upstream order.
pub fn parse_flyover_passes(body: &str) -> Result<Vec<FlyoverPass>> {
    let parsed: FlyoverResponse = serde_json::from_str(body)
        .map_err(|e| FlyoverError::malformed(Stage::Flyover, e.to_string()))?;

    parsed
        .response
        .ok_or_else(|| FlyoverError::malformed(Stage::Flyover, "missing field `response`"))
}

/// Fetch upcoming ISS passes over `coordinates`.
pub async fn fetch_iss_flyover_times(
    fetcher: &dyn Fetcher,
    base: &str,
    coordinates: &Coordinates,
) -> Result<Vec<FlyoverPass>> {
    let url = flyover_url(base, coordinates);
    let body = fetcher.fetch(&url).await?;
    let passes = parse_flyover_passes(&body)?;
    tracing::debug!("{} passes predicted for {}", passes.len(), coordinates);
    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;

    fn coords() -> Coordinates {
        Coordinates::from_degrees(37.4219, -122.084)
    }

    #[test]
    fn test_flyover_url() {
        assert_eq!(
            flyover_url("https://iss-flyover.herokuapp.com/json/", &coords()),
            "https://iss-flyover.herokuapp.com/json/?lat=37.42190&lon=-122.08400"
        );
        assert_eq!(
            flyover_url("http://iss.test/json/?n=5", &coords()),
            "http://iss.test/json/?n=5&lat=37.42190&lon=-122.08400"
        );
    }

    #[test]
    fn test_parse_passes_keeps_order() {
        // deliberately not chronological: nothing may be re-sorted
        let body = r#"{"message":"success","response":[
            {"risetime":1700005000,"duration":300},
            {"risetime":1700000000,"duration":420},
            {"risetime":1700000000,"duration":420}
        ]}"#;
        let passes = parse_flyover_passes(body).unwrap();
        assert_eq!(
            passes,
            vec![
                FlyoverPass { risetime: 1_700_005_000, duration: 300 },
                FlyoverPass { risetime: 1_700_000_000, duration: 420 },
                FlyoverPass { risetime: 1_700_000_000, duration: 420 },
            ]
        );
    }

    #[test]
    fn test_parse_passes_empty_array() {
        assert!(parse_flyover_passes(r#"{"response":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_passes_malformed() {
        for body in [
            r#"{"message":"failure"}"#,
            r#"{"response":null}"#,
            r#"{"response":{"risetime":1,"duration":2}}"#,
            r#"{"response":[{"risetime":1}]}"#,
            "not json",
        ] {
            let err = parse_flyover_passes(body).unwrap_err();
            assert!(
                matches!(err, FlyoverError::MalformedResponse { stage: Stage::Flyover, .. }),
                "unexpected error for {}: {:?}",
                body,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_flyover_times() {
        let fetcher = MockFetcher::new().route(
            "http://iss.test/json/",
            r#"{"response":[{"risetime":1700000000,"duration":420}]}"#,
        );
        let passes = fetch_iss_flyover_times(&fetcher, "http://iss.test/json/", &coords())
            .await
            .unwrap();
        assert_eq!(passes, vec![FlyoverPass { risetime: 1_700_000_000, duration: 420 }]);
        assert_eq!(
            fetcher.requests(),
            vec!["http://iss.test/json/?lat=37.42190&lon=-122.08400".to_string()]
        );
    }
}
