pub mod autoplay;
pub mod events;
pub mod navigation;
pub mod surface;
pub mod theme;

pub use autoplay::{AutoplayController, AutoplayState};
pub use events::{EventBus, GalleryEvent, SubscriptionId};
pub use navigation::{
    indicator_for, ArrowsIndicator, BulletsIndicator, NavigationIndicator, NavigationInput,
    NavigationRequest,
};
pub use surface::GallerySurface;
pub use theme::ThemeController;
