//! Stage resolvers
//!
//! Each resolver performs exactly one request through a [`Fetcher`](crate::fetcher::Fetcher)
//! and turns the body into a typed value. Parsing lives in plain functions so it
//! can be tested without a network.

pub mod flyover;
pub mod geo;
pub mod ip;

pub use flyover::{fetch_iss_flyover_times, flyover_url, parse_flyover_passes};
pub use geo::{fetch_coords_by_ip, geolocation_url, parse_coordinates};
pub use ip::{fetch_my_ip, parse_ip};
