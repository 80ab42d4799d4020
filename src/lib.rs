//! Pane layout and navigation engine for paged tile galleries.
//!
//! The engine splits a gallery's items into fixed-size panes sized from the
//! container width, keeps the navigation controls and the autoplay timer in
//! step with the active pane, and hands the actual drawing to a
//! [`GallerySurface`] implementation.

pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod ui;

pub use config::GalleryConfig;
pub use error::{ConfigError, GalleryError, Result};
pub use layout::{PaneLayout, PaneSnapshot, SizeEstimator};
pub use ui::{EventBus, GalleryEvent, GallerySurface, ThemeController};
