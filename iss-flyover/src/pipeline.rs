///! IP → coordinates → ISS passes
///!
///! Runs the three resolvers strictly in order. The first failure ends the run
///! and is returned exactly as the failing resolver produced it.

use iss_common::{Coordinates, FlyoverPass, Stage};

use crate::config::EndpointConfig;
use crate::error::{FlyoverError, Result};
use crate::fetcher::Fetcher;
use crate::resolver::{fetch_coords_by_ip, fetch_iss_flyover_times, fetch_my_ip};

/// Progress of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    IpResolved {
        ip: String,
    },
    CoordinatesResolved {
        ip: String,
        coordinates: Coordinates,
    },
    PassesResolved {
        passes: Vec<FlyoverPass>,
    },
    Failed {
        stage: Stage,
    },
}

/// Stateless between runs; one pipeline can serve any number of concurrent runs.
pub struct FlyoverPipeline<F> {
    fetcher: F,
    endpoints: EndpointConfig,
}

impl<F: Fetcher> FlyoverPipeline<F> {
    pub fn new(fetcher: F, endpoints: EndpointConfig) -> Self {
        Self { fetcher, endpoints }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve the upcoming passes for the caller's current location.
    pub async fn run(&self) -> Result<Vec<FlyoverPass>> {
        self.run_observed(|_| {}).await
    }

    /// Same as [`run`](Self::run), calling `observe` on every state entered,
    /// terminal states included.
    pub async fn run_observed(
        &self,
        mut observe: impl FnMut(&PipelineState),
    ) -> Result<Vec<FlyoverPass>> {
        let fetcher: &dyn Fetcher = &self.fetcher;
        observe(&PipelineState::Start);

        let ip = fetch_my_ip(fetcher, &self.endpoints.ip_lookup)
            .await
            .map_err(|e| fail(Stage::IpLookup, e, &mut observe))?;
        observe(&PipelineState::IpResolved { ip: ip.clone() });

        let coordinates = fetch_coords_by_ip(fetcher, &self.endpoints.geolocation, &ip)
            .await
            .map_err(|e| fail(Stage::Geolocation, e, &mut observe))?;
        observe(&PipelineState::CoordinatesResolved {
            ip,
            coordinates: coordinates.clone(),
        });

        let passes = fetch_iss_flyover_times(fetcher, &self.endpoints.flyover, &coordinates)
            .await
            .map_err(|e| fail(Stage::Flyover, e, &mut observe))?;
        tracing::info!("Resolved {} upcoming ISS passes", passes.len());

        observe(&PipelineState::PassesResolved {
            passes: passes.clone(),
        });
        Ok(passes)
    }
}

fn fail(
    stage: Stage,
    error: FlyoverError,
    observe: &mut impl FnMut(&PipelineState),
) -> FlyoverError {
    tracing::warn!("Stage {} failed: {}", stage, error);
    observe(&PipelineState::Failed { stage });
    error
}

/// One-shot convenience wrapper around [`FlyoverPipeline::run`].
pub async fn next_iss_times_for_my_location<F: Fetcher>(
    fetcher: F,
    endpoints: EndpointConfig,
) -> Result<Vec<FlyoverPass>> {
    FlyoverPipeline::new(fetcher, endpoints).run().await
}
