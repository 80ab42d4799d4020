pub mod navigation_state;
pub mod tile_metrics;

pub use navigation_state::*;
pub use tile_metrics::*;
