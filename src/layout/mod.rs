pub mod estimator;
pub mod pane_layout;
pub mod placement;

pub use estimator::SizeEstimator;
pub use pane_layout::{PaneLayout, PaneSnapshot, Relayout};
pub use placement::{compute_placement, NavigationFootprint, Placement, PlacementOptions, Rect};
