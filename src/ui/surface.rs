use crate::layout::Placement;
use crate::models::NavigationState;

/// Rendering collaborator that owns the visible tiles and the lightbox.
///
/// The engine only computes geometry and indices; implementations realize
/// them. Container and pointer events travel the other way through
/// [`super::events::EventBus`].
pub trait GallerySurface {
    /// Outer width of the gallery container in pixels.
    fn container_width(&self) -> f32;

    fn item_count(&self) -> usize;

    /// Shows `items` (absolute item indices, slot order) as pane `pane`.
    fn render_pane(&mut self, pane: usize, items: &[usize]);

    fn open_lightbox(&mut self, item_index: usize);

    fn sync_navigation(&mut self, _state: &NavigationState) {}

    fn apply_placement(&mut self, _placement: &Placement) {}

    /// Toggles the preloader while items are being replaced.
    fn set_loading(&mut self, _loading: bool) {}
}
