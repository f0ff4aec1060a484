pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod resolver;

pub use config::{EndpointConfig, FlyoverConfig};
pub use error::FlyoverError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use pipeline::{FlyoverPipeline, PipelineState, next_iss_times_for_my_location};
