//! Bid-ask spread estimation from open, high, low and close prices.
//!
//! The single-window estimator lives in [`estimator`]. Rolling and expanding
//! estimates are produced by [`rolling::EdgeEngine`], which keeps windowed
//! means of the per-bar terms in [`features`] and rebuilds the estimate from
//! those means alone, so every step costs the same regardless of window size.

pub mod config;
pub mod error;
pub mod estimator;
pub mod features;
pub mod logging;
pub mod model;
pub mod reconstruct;
pub mod rolling;
pub mod transform;
pub mod window;

pub use error::EdgeError;
pub use estimator::{edge, edge_records, edge_series};
pub use model::bar::Bar;
pub use model::series::PriceSeries;
pub use rolling::{edge_expanding, edge_rolling, EdgeEngine, ExpandingConfig, RollingConfig};
pub use transform::MidPrice;
