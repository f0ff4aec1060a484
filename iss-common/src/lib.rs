pub mod types;

pub use types::{Coordinates, FlyoverPass, Stage};
