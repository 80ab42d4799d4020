//! Theme controller: wires the pane layout, navigation, autoplay and the
//! rendering surface of one gallery instance together.
//!
//! All state changes happen on whichever task owns the controller, one event
//! at a time. Surface callbacks cannot re-enter the controller; anything the
//! surface publishes while rendering is queued and handled afterwards.

use std::ops::ControlFlow;

use flume::{Receiver, Sender};
use tracing::{debug, info, warn};

use super::autoplay::{AutoplayController, AutoplayState};
use super::events::{EventBus, GalleryEvent, SubscriptionId};
use super::navigation::{indicator_for, NavigationIndicator, NavigationInput, NavigationRequest};
use super::surface::GallerySurface;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::layout::{compute_placement, PaneLayout, PaneSnapshot, Placement};
use crate::models::{Direction, NavigationState};

pub struct ThemeController<S: GallerySurface> {
    config: GalleryConfig,
    surface: S,
    layout: PaneLayout,
    navigation: Option<Box<dyn NavigationIndicator>>,
    autoplay: Option<AutoplayController>,
    bus: EventBus,
    subscription: Option<SubscriptionId>,
    inbox_tx: Sender<GalleryEvent>,
    inbox: Receiver<GalleryEvent>,
    /// Outer container width, before gallery padding.
    container_width: f32,
    pending_auto_open: Option<usize>,
    /// Autoplay state to restore once the running reload completes.
    autoplay_after_reload: AutoplayState,
    loading: bool,
    destroyed: bool,
}

/// Autoplay requests from the public API and the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoplayCommand {
    Start,
    Stop,
    Pause,
    Resume,
}

impl AutoplayCommand {
    /// The state a controller in `state` ends up in after this command.
    fn apply_to(self, state: AutoplayState) -> AutoplayState {
        match (self, state) {
            (Self::Start, _) => AutoplayState::Running,
            (Self::Stop, _) => AutoplayState::Stopped,
            (Self::Pause, AutoplayState::Running) => AutoplayState::Paused,
            (Self::Resume, AutoplayState::Paused) => AutoplayState::Running,
            (_, state) => state,
        }
    }
}

impl<S: GallerySurface> std::fmt::Debug for ThemeController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("layout", &self.layout.snapshot())
            .field("navigation", &self.navigation)
            .field("autoplay", &self.autoplay_state())
            .field("loading", &self.loading)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl<S: GallerySurface> ThemeController<S> {
    /// Validates `config`, lays out the surface's items, subscribes to `bus`
    /// and renders the first pane.
    ///
    /// Nothing is subscribed or rendered when this fails. Autoplay needs a
    /// tokio runtime when `autoplay_interval_ms` is set.
    pub fn init(config: GalleryConfig, surface: S, bus: &EventBus) -> Result<Self> {
        config.validate()?;

        let container_width = surface.container_width();
        let mut layout = PaneLayout::new(config.size_estimator());
        layout.initialize(surface.item_count(), config.available_width(container_width))?;

        let (inbox_tx, inbox) = flume::unbounded();
        let autoplay = config
            .autoplay_interval()
            .map(|interval| AutoplayController::new(interval, inbox_tx.clone()))
            .transpose()?;

        let subscription = bus.subscribe(inbox_tx.clone());
        let mut controller = Self {
            navigation: indicator_for(&config),
            pending_auto_open: config.auto_open,
            config,
            surface,
            layout,
            autoplay,
            bus: bus.clone(),
            subscription: Some(subscription),
            inbox_tx,
            inbox,
            container_width,
            autoplay_after_reload: AutoplayState::Stopped,
            loading: false,
            destroyed: false,
        };

        controller.refresh();
        if let Some(autoplay) = controller.autoplay.as_mut() {
            autoplay.start();
        }
        controller.sync_play_state();

        info!(
            items = controller.layout.item_count(),
            panes = controller.layout.total_panes(),
            theme = ?controller.config.theme,
            "Gallery theme initialized"
        );
        Ok(controller)
    }

    // ----- public API -----

    /// Shows pane `index`. Negative or past-the-end indices are caller bugs
    /// and fail with [`GalleryError::OutOfRange`]; an empty or reloading
    /// gallery ignores the call.
    pub fn go_to_pane(&mut self, index: i64) -> Result<()> {
        self.ensure_live()?;
        if self.loading || self.layout.is_empty() {
            return Ok(());
        }
        let total_panes = self.layout.total_panes();
        let out_of_range = || GalleryError::OutOfRange { index, total_panes };
        let pane = usize::try_from(index).map_err(|_| out_of_range())?;
        let changed = self.layout.go_to_pane(pane).map_err(|_| out_of_range())?;
        if changed {
            self.show_active_pane();
        }
        Ok(())
    }

    pub fn next_pane(&mut self) -> Result<()> {
        self.step(Direction::Next)
    }

    pub fn previous_pane(&mut self) -> Result<()> {
        self.step(Direction::Previous)
    }

    fn step(&mut self, direction: Direction) -> Result<()> {
        self.ensure_live()?;
        if !self.loading && self.layout.advance(direction) {
            self.show_active_pane();
        }
        Ok(())
    }

    /// Moves the view by `tiles` items and shows the pane that now holds the
    /// first visible item, wrapping around the item set.
    pub fn scroll_tiles(&mut self, direction: Direction, tiles: usize) -> Result<()> {
        self.ensure_live()?;
        if !self.loading && self.layout.scroll_tiles(direction, tiles) {
            self.show_active_pane();
        }
        Ok(())
    }

    pub fn start_autoplay(&mut self) {
        self.with_autoplay(AutoplayCommand::Start);
    }

    pub fn stop_autoplay(&mut self) {
        self.with_autoplay(AutoplayCommand::Stop);
    }

    pub fn pause_autoplay(&mut self) {
        self.with_autoplay(AutoplayCommand::Pause);
    }

    pub fn resume_autoplay(&mut self) {
        self.with_autoplay(AutoplayCommand::Resume);
    }

    /// While a reload runs the timer stays stopped; requests only change the
    /// state that is restored when the reload completes.
    fn with_autoplay(&mut self, command: AutoplayCommand) {
        if self.destroyed {
            return;
        }
        let Some(autoplay) = self.autoplay.as_mut() else {
            debug!("Autoplay is not configured for this gallery");
            return;
        };
        if self.loading {
            self.autoplay_after_reload = command.apply_to(self.autoplay_after_reload);
            debug!(
                ?command,
                state = ?self.autoplay_after_reload,
                "Autoplay change deferred until reload completes"
            );
            return;
        }
        match command {
            AutoplayCommand::Start => autoplay.start(),
            AutoplayCommand::Stop => autoplay.stop(),
            AutoplayCommand::Pause => autoplay.pause(),
            AutoplayCommand::Resume => autoplay.resume(),
        }
        self.sync_play_state();
    }

    fn restore_autoplay(&mut self, state: AutoplayState) {
        if let Some(autoplay) = self.autoplay.as_mut() {
            match state {
                AutoplayState::Stopped => {}
                AutoplayState::Running => autoplay.start(),
                AutoplayState::Paused => {
                    autoplay.start();
                    autoplay.pause();
                }
            }
        }
        self.sync_play_state();
    }

    /// Detaches from the event bus and cancels the autoplay timer.
    /// Safe to call more than once; also runs on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.dispose();
        }
        info!("Gallery theme destroyed");
    }

    // ----- event handling -----

    /// Applies one event. Failures are logged here and never reach the
    /// caller; after `destroy` every event is ignored.
    pub fn handle_event(&mut self, event: GalleryEvent) -> ControlFlow<()> {
        if self.destroyed {
            debug!(?event, "Ignoring event after destroy");
            return ControlFlow::Break(());
        }

        match event {
            GalleryEvent::Resized { width } => self.on_resize(width),
            GalleryEvent::ReloadStarted => self.on_reload_started(),
            GalleryEvent::ReloadCompleted => self.on_reload_completed(),
            GalleryEvent::TileClicked { slot } => self.on_tile_clicked(slot),
            GalleryEvent::Navigation(input) => self.on_navigation(input),
            GalleryEvent::PointerEntered => {
                if self.config.pause_on_hover {
                    self.pause_autoplay();
                }
            }
            GalleryEvent::PointerLeft => {
                if self.config.pause_on_hover {
                    self.resume_autoplay();
                }
            }
            GalleryEvent::AutoplayTick {
                generation,
                fired_at,
            } => self.on_autoplay_tick(generation, fired_at),
            GalleryEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Handles every event already queued, without waiting.
    /// Returns how many events were applied.
    pub fn dispatch_pending(&mut self) -> usize {
        let events = coalesce_resizes(self.inbox.try_iter().collect());
        let count = events.len();
        for event in events {
            if self.handle_event(event).is_break() {
                self.destroy();
                break;
            }
        }
        count
    }

    /// Processes events until [`GalleryEvent::Shutdown`], then destroys the
    /// theme. Bursts of resize events are collapsed into the latest width.
    pub async fn run(&mut self) {
        while !self.destroyed {
            let Ok(first) = self.inbox.recv_async().await else {
                break;
            };
            let mut batch = vec![first];
            batch.extend(self.inbox.try_iter());

            for event in coalesce_resizes(batch) {
                if self.handle_event(event).is_break() {
                    self.destroy();
                    return;
                }
            }
        }
        self.destroy();
    }

    fn on_resize(&mut self, width: f32) {
        if self.loading {
            // applied by the reload, or to the old panes if it fails
            if width.is_finite() && width >= 0.0 {
                self.container_width = width;
            } else {
                warn!(width, "Ignoring resize");
            }
            return;
        }
        let available = self.config.available_width(width);
        let relayout = match self.layout.recompute_for_width(available) {
            Ok(relayout) => relayout,
            Err(err) => {
                warn!(error = ?err, width, "Ignoring resize");
                return;
            }
        };
        self.container_width = width;

        if relayout.needs_render() || relayout.active_pane_clamped {
            self.render_active_pane();
            self.sync_navigation();
        }
        self.place();
    }

    fn on_reload_started(&mut self) {
        debug!("Reload started, hiding panes");
        if !self.loading {
            self.autoplay_after_reload = self.autoplay_state();
        }
        self.loading = true;
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.stop();
        }
        if let Some(navigation) = self.navigation.as_mut() {
            navigation.set_visible(false);
        }
        self.sync_navigation();
        self.sync_play_state();
        self.surface.set_loading(true);
    }

    fn on_reload_completed(&mut self) {
        let container_width = self.surface.container_width();
        let item_count = self.surface.item_count();
        let autoplay_state = if self.loading {
            self.autoplay_after_reload
        } else {
            self.autoplay_state()
        };

        let mut layout = PaneLayout::new(self.config.size_estimator());
        if let Err(err) = layout.initialize(item_count, self.config.available_width(container_width)) {
            warn!(error = ?err, item_count, "Reload failed, keeping previous panes");
            let available = self.config.available_width(self.container_width);
            if let Err(err) = self.layout.recompute_for_width(available) {
                debug!(error = ?err, "Keeping previous width");
            }
            if let Some(navigation) = self.navigation.as_mut() {
                navigation.set_visible(true);
            }
            self.finish_loading();
            self.restore_autoplay(autoplay_state);
            return;
        }

        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.stop();
        }
        self.layout = layout;
        self.navigation = indicator_for(&self.config);
        self.container_width = container_width;
        self.finish_loading();
        self.restore_autoplay(autoplay_state);
        info!(
            items = item_count,
            panes = self.layout.total_panes(),
            "Gallery reloaded"
        );
    }

    fn finish_loading(&mut self) {
        self.loading = false;
        self.surface.set_loading(false);
        self.refresh();
    }

    fn on_tile_clicked(&mut self, slot: usize) {
        if self.loading {
            return;
        }
        let Some(pane) = self.layout.active_pane() else {
            return;
        };
        match self.layout.item_at(pane, slot) {
            Some(item) => {
                debug!(pane, slot, item, "Opening lightbox");
                self.surface.open_lightbox(item);
            }
            None => debug!(pane, slot, "Click on empty slot"),
        }
    }

    fn on_navigation(&mut self, input: NavigationInput) {
        if self.loading {
            debug!(?input, "Navigation ignored while reloading");
            return;
        }
        let Some(request) = self
            .navigation
            .as_ref()
            .and_then(|navigation| navigation.interpret(input))
        else {
            debug!(?input, "Navigation input ignored");
            return;
        };

        match request {
            NavigationRequest::Pane(pane) => match self.layout.go_to_pane(pane) {
                Ok(true) => self.show_active_pane(),
                Ok(false) => {}
                Err(err) => warn!(error = ?err, "Rejected pane request"),
            },
            NavigationRequest::Step(direction) => {
                if self.layout.advance(direction) {
                    self.show_active_pane();
                }
            }
            NavigationRequest::ToggleAutoplay => match self.autoplay_state() {
                AutoplayState::Stopped => self.start_autoplay(),
                AutoplayState::Running | AutoplayState::Paused => self.stop_autoplay(),
            },
        }
    }

    fn on_autoplay_tick(&mut self, generation: u64, fired_at: tokio::time::Instant) {
        let accepted = self
            .autoplay
            .as_mut()
            .is_some_and(|autoplay| autoplay.accept_tick(generation, fired_at));
        if accepted && !self.loading && self.layout.advance(Direction::Next) {
            self.show_active_pane();
        }
    }

    // ----- rendering -----

    fn refresh(&mut self) {
        self.render_active_pane();
        self.sync_navigation();
        self.place();
        self.try_auto_open();
    }

    fn show_active_pane(&mut self) {
        self.render_active_pane();
        self.sync_navigation();
    }

    fn render_active_pane(&mut self) {
        let pane = self.layout.active_pane().unwrap_or(0);
        let items: Vec<usize> = self.layout.items_in_pane(pane).collect();
        self.surface.render_pane(pane, &items);
    }

    fn sync_navigation(&mut self) {
        let total = self.layout.total_panes();
        let active = self.layout.active_pane().unwrap_or(0);
        if let Some(navigation) = self.navigation.as_mut() {
            navigation.sync(total, active);
        }
        let state = self.navigation_state();
        self.surface.sync_navigation(&state);
    }

    fn sync_play_state(&mut self) {
        let playing = self.autoplay_state() == AutoplayState::Running;
        if let Some(navigation) = self.navigation.as_mut() {
            navigation.set_playing(playing);
        }
    }

    fn place(&mut self) {
        let placement = self.placement();
        self.surface.apply_placement(&placement);
    }

    fn try_auto_open(&mut self) {
        let Some(item) = self.pending_auto_open else {
            return;
        };
        if item < self.layout.item_count() {
            self.pending_auto_open = None;
            self.surface.open_lightbox(item);
        }
    }

    // ----- accessors -----

    pub fn placement(&self) -> Placement {
        let estimator = self.layout.estimator();
        let width = self.layout.container_width();
        let items = self.layout.item_count();
        let footprint = self
            .navigation
            .as_ref()
            .filter(|navigation| navigation.state().visible)
            .map(|navigation| navigation.footprint());

        compute_placement(
            self.container_width,
            estimator.grid_width(items, width),
            estimator.pane_height(items, width),
            footprint,
            &self.config.placement_options(),
        )
    }

    pub fn navigation_state(&self) -> NavigationState {
        match self.navigation.as_ref() {
            Some(navigation) => navigation.state(),
            None => NavigationState::hidden(self.layout.total_panes()),
        }
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        self.autoplay
            .as_ref()
            .map_or(AutoplayState::Stopped, AutoplayController::state)
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        self.layout.snapshot()
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Another handle to the controller's inbox, for select loops that must
    /// not borrow the controller while waiting.
    pub fn inbox(&self) -> Receiver<GalleryEvent> {
        self.inbox.clone()
    }

    /// Sender feeding the controller's inbox directly, bypassing the bus.
    pub fn sender(&self) -> Sender<GalleryEvent> {
        self.inbox_tx.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            Err(GalleryError::Destroyed)
        } else {
            Ok(())
        }
    }
}

impl<S: GallerySurface> Drop for ThemeController<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Drops all but the last resize in a batch; each resize is absolute, so
/// only the latest width matters.
fn coalesce_resizes(events: Vec<GalleryEvent>) -> Vec<GalleryEvent> {
    let last_resize = events
        .iter()
        .rposition(|event| matches!(event, GalleryEvent::Resized { .. }));

    events
        .into_iter()
        .enumerate()
        .filter(|(index, event)| {
            !matches!(event, GalleryEvent::Resized { .. }) || Some(*index) == last_resize
        })
        .map(|(_, event)| event)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NavigationType;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Debug, Default)]
    struct RecordingSurface {
        width: f32,
        items: usize,
        rendered: Vec<(usize, Vec<usize>)>,
        lightbox: Vec<usize>,
        navigation: Vec<NavigationState>,
        placements: Vec<Placement>,
        loading: Vec<bool>,
    }

    impl RecordingSurface {
        fn new(width: f32, items: usize) -> Self {
            Self {
                width,
                items,
                ..Self::default()
            }
        }

        fn last_rendered(&self) -> &(usize, Vec<usize>) {
            self.rendered.last().expect("nothing rendered")
        }
    }

    impl GallerySurface for RecordingSurface {
        fn container_width(&self) -> f32 {
            self.width
        }

        fn item_count(&self) -> usize {
            self.items
        }

        fn render_pane(&mut self, pane: usize, items: &[usize]) {
            self.rendered.push((pane, items.to_vec()));
        }

        fn open_lightbox(&mut self, item_index: usize) {
            self.lightbox.push(item_index);
        }

        fn sync_navigation(&mut self, state: &NavigationState) {
            self.navigation.push(*state);
        }

        fn apply_placement(&mut self, placement: &Placement) {
            self.placements.push(*placement);
        }

        fn set_loading(&mut self, loading: bool) {
            self.loading.push(loading);
        }
    }

    /// 100px tiles without gaps, two rows: 300px wide holds 6 tiles a pane.
    fn config() -> GalleryConfig {
        GalleryConfig {
            tile_width: 100.0,
            tile_height: 100.0,
            grid_padding: 0.0,
            space_between_cols: 0.0,
            space_between_rows: 0.0,
            rows_per_pane: Some(2),
            ..GalleryConfig::default()
        }
    }

    fn theme(config: GalleryConfig, items: usize) -> (ThemeController<RecordingSurface>, EventBus) {
        let bus = EventBus::new();
        let theme = ThemeController::init(config, RecordingSurface::new(300.0, items), &bus).unwrap();
        (theme, bus)
    }

    #[test]
    fn test_init_renders_first_pane() {
        let (theme, bus) = theme(config(), 23);
        assert_eq!(theme.surface().last_rendered(), &(0, (0..6).collect()));
        assert_eq!(
            theme.navigation_state(),
            NavigationState {
                control_count: 4,
                highlighted: Some(0),
                visible: true,
            }
        );
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(theme.surface().placements.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_fatal_and_leaves_nothing_behind() {
        let bus = EventBus::new();
        let config = GalleryConfig {
            tile_width: 0.0,
            ..config()
        };
        let err = ThemeController::init(config, RecordingSurface::new(300.0, 10), &bus).unwrap_err();
        assert!(matches!(err, GalleryError::Configuration(_)));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_single_pane_hides_navigation_for_every_type() {
        for navigation_type in [NavigationType::Bullets, NavigationType::Arrows, NavigationType::None] {
            let config = GalleryConfig {
                navigation_type,
                ..config()
            };
            let (theme, _bus) = theme(config, 5);
            assert_eq!(theme.layout().total_panes(), 1);
            assert!(!theme.navigation_state().visible, "{navigation_type:?}");
            assert!(theme.placement().navigation.is_none());
        }
    }

    #[test]
    fn test_go_to_pane_renders_and_highlights() {
        let (mut theme, _bus) = theme(config(), 23);
        theme.go_to_pane(2).unwrap();
        assert_eq!(theme.surface().last_rendered(), &(2, (12..18).collect()));
        assert_eq!(theme.navigation_state().highlighted, Some(2));
    }

    #[test]
    fn test_go_to_pane_out_of_range() {
        let (mut theme, _bus) = theme(config(), 23);
        for index in [4, -1] {
            let err = theme.go_to_pane(index).unwrap_err();
            assert!(
                matches!(err, GalleryError::OutOfRange { total_panes: 4, .. }),
                "{err}"
            );
        }
        assert_eq!(theme.snapshot().active_pane, Some(0));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let (mut theme, _bus) = theme(config(), 23);
        theme.previous_pane().unwrap();
        assert_eq!(theme.snapshot().active_pane, Some(3));
        assert_eq!(theme.surface().last_rendered(), &(3, (18..23).collect()));
        theme.next_pane().unwrap();
        assert_eq!(theme.snapshot().active_pane, Some(0));
    }

    #[test]
    fn test_empty_gallery_is_idle() {
        let (mut theme, _bus) = theme(config(), 0);
        assert_eq!(theme.snapshot().active_pane, None);
        assert!(theme.go_to_pane(3).is_ok());
        assert!(theme.go_to_pane(-1).is_ok());
        assert!(theme.next_pane().is_ok());
        assert!(!theme.navigation_state().visible);
        assert_eq!(theme.surface().last_rendered(), &(0, Vec::new()));
    }

    #[test]
    fn test_resize_through_bus_clamps_and_resyncs() {
        let (mut theme, bus) = theme(config(), 23);
        theme.go_to_pane(3).unwrap();

        bus.publish(GalleryEvent::Resized { width: 600.0 });
        assert_eq!(theme.dispatch_pending(), 1);

        assert_eq!(theme.layout().total_panes(), 2);
        assert_eq!(theme.snapshot().active_pane, Some(1));
        assert_eq!(theme.surface().last_rendered(), &(1, (12..23).collect()));
        assert_eq!(
            theme.surface().navigation.last().copied(),
            Some(NavigationState {
                control_count: 2,
                highlighted: Some(1),
                visible: true,
            })
        );
    }

    #[test]
    fn test_resize_in_same_bucket_does_not_rerender() {
        let (mut theme, bus) = theme(config(), 23);
        let renders = theme.surface().rendered.len();
        bus.publish(GalleryEvent::Resized { width: 350.0 });
        theme.dispatch_pending();
        assert_eq!(theme.surface().rendered.len(), renders);
        // the grid is still re-centered
        assert_eq!(theme.surface().placements.len(), 2);
    }

    #[test]
    fn test_invalid_resize_is_logged_and_ignored() {
        let (mut theme, bus) = theme(config(), 23);
        theme.go_to_pane(2).unwrap();
        let before = theme.snapshot();

        bus.publish(GalleryEvent::Resized { width: f32::NAN });
        bus.publish(GalleryEvent::TileClicked { slot: 0 });
        theme.dispatch_pending();

        assert_eq!(theme.snapshot(), before);
        assert_eq!(theme.surface().lightbox, vec![12]);
    }

    #[test]
    fn test_resize_burst_is_coalesced() {
        let events = vec![
            GalleryEvent::Resized { width: 100.0 },
            GalleryEvent::PointerEntered,
            GalleryEvent::Resized { width: 200.0 },
            GalleryEvent::Resized { width: 300.0 },
        ];
        assert_eq!(
            coalesce_resizes(events),
            vec![
                GalleryEvent::PointerEntered,
                GalleryEvent::Resized { width: 300.0 },
            ]
        );
    }

    #[test]
    fn test_bullet_click_funnels_through_layout() {
        let (mut theme, bus) = theme(config(), 23);
        bus.publish(GalleryEvent::Navigation(NavigationInput::Bullet(3)));
        bus.publish(GalleryEvent::Navigation(NavigationInput::Bullet(9)));
        bus.publish(GalleryEvent::Navigation(NavigationInput::Arrow(Direction::Next)));
        theme.dispatch_pending();

        // out-of-range bullet and arrow input are ignored by the bullets
        assert_eq!(theme.snapshot().active_pane, Some(3));
        assert_eq!(theme.navigation_state().highlighted, Some(3));
    }

    #[test]
    fn test_arrows_step_with_wraparound() {
        let config = GalleryConfig {
            navigation_type: NavigationType::Arrows,
            ..config()
        };
        let (mut theme, bus) = theme(config, 23);
        bus.publish(GalleryEvent::Navigation(NavigationInput::Arrow(Direction::Previous)));
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(3));
        assert_eq!(theme.navigation_state().highlighted, None);
    }

    #[test]
    fn test_tile_click_opens_absolute_item() {
        let (mut theme, bus) = theme(config(), 23);
        theme.go_to_pane(1).unwrap();
        bus.publish(GalleryEvent::TileClicked { slot: 2 });
        theme.dispatch_pending();
        assert_eq!(theme.surface().lightbox, vec![8]);

        theme.go_to_pane(3).unwrap();
        bus.publish(GalleryEvent::TileClicked { slot: 5 });
        theme.dispatch_pending();
        assert_eq!(theme.surface().lightbox, vec![8], "slot 5 of the last pane is empty");
    }

    #[test]
    fn test_reload_replaces_layout() {
        let (mut theme, bus) = theme(config(), 23);
        theme.go_to_pane(3).unwrap();

        bus.publish(GalleryEvent::ReloadStarted);
        theme.dispatch_pending();
        assert!(theme.is_loading());
        assert!(!theme.navigation_state().visible);

        // clicks during loading go nowhere
        bus.publish(GalleryEvent::TileClicked { slot: 0 });
        theme.dispatch_pending();
        assert!(theme.surface().lightbox.is_empty());

        theme.surface_mut().items = 7;
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();

        assert!(!theme.is_loading());
        assert_eq!(theme.surface().loading, vec![true, false]);
        assert_eq!(theme.layout().total_panes(), 2);
        assert_eq!(theme.snapshot().active_pane, Some(0));
        assert!(theme.navigation_state().visible);
        assert_eq!(theme.surface().last_rendered(), &(0, (0..6).collect()));
    }

    #[test]
    fn test_failed_reload_keeps_previous_panes() {
        let (mut theme, bus) = theme(config(), 23);
        theme.go_to_pane(1).unwrap();

        bus.publish(GalleryEvent::ReloadStarted);
        theme.dispatch_pending();
        theme.surface_mut().width = f32::NAN;
        theme.surface_mut().items = 3;
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();

        assert!(!theme.is_loading());
        assert_eq!(theme.snapshot().item_count, 23);
        assert_eq!(theme.snapshot().active_pane, Some(1));
        assert!(theme.navigation_state().visible);
    }

    #[test]
    fn test_resize_and_navigation_wait_for_reload() {
        let (mut theme, bus) = theme(config(), 23);
        bus.publish(GalleryEvent::ReloadStarted);
        theme.dispatch_pending();
        let renders = theme.surface().rendered.len();

        theme.surface_mut().width = 600.0;
        bus.publish(GalleryEvent::Resized { width: 600.0 });
        bus.publish(GalleryEvent::Navigation(NavigationInput::Bullet(1)));
        theme.dispatch_pending();
        theme.go_to_pane(2).unwrap();
        theme.go_to_pane(-1).unwrap();
        theme.next_pane().unwrap();
        theme.scroll_tiles(Direction::Next, 6).unwrap();

        assert_eq!(theme.surface().rendered.len(), renders);
        assert_eq!(theme.snapshot().active_pane, Some(0));

        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.layout().total_panes(), 2);
        assert_eq!(theme.surface().last_rendered(), &(0, (0..12).collect()));
    }

    #[test]
    fn test_failed_reload_applies_width_seen_while_loading() {
        let (mut theme, bus) = theme(config(), 23);
        bus.publish(GalleryEvent::ReloadStarted);
        bus.publish(GalleryEvent::Resized { width: 600.0 });
        theme.dispatch_pending();

        theme.surface_mut().width = f32::NAN;
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();

        assert_eq!(theme.snapshot().item_count, 23);
        assert_eq!(theme.layout().total_panes(), 2);
        assert_eq!(theme.surface().last_rendered(), &(0, (0..12).collect()));
    }

    #[test]
    fn test_scroll_tiles_syncs_navigation() {
        let (mut theme, _bus) = theme(config(), 23);
        theme.scroll_tiles(Direction::Next, 13).unwrap();
        assert_eq!(theme.snapshot().active_pane, Some(2));
        assert_eq!(theme.navigation_state().highlighted, Some(2));
        assert_eq!(theme.surface().last_rendered(), &(2, (12..18).collect()));

        theme.scroll_tiles(Direction::Previous, 12).unwrap();
        assert_eq!(theme.snapshot().active_pane, Some(0));

        theme.destroy();
        assert!(matches!(
            theme.scroll_tiles(Direction::Next, 1),
            Err(GalleryError::Destroyed)
        ));
    }

    #[test]
    fn test_auto_open_waits_for_enough_items() {
        let config = GalleryConfig {
            auto_open: Some(5),
            ..config()
        };
        let (mut theme, bus) = theme(config, 2);
        assert!(theme.surface().lightbox.is_empty());

        theme.surface_mut().items = 10;
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.surface().lightbox, vec![5]);

        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.surface().lightbox, vec![5], "auto open happens once");
    }

    #[test]
    fn test_destroy_detaches_and_rejects_calls() {
        let (mut theme, bus) = theme(config(), 23);
        theme.destroy();
        theme.destroy();

        assert!(theme.is_destroyed());
        assert_eq!(bus.subscriber_count(), 0);
        assert!(matches!(theme.next_pane(), Err(GalleryError::Destroyed)));
        assert!(matches!(theme.go_to_pane(1), Err(GalleryError::Destroyed)));
        theme.start_autoplay();
        assert_eq!(theme.autoplay_state(), AutoplayState::Stopped);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (theme, bus) = theme(config(), 23);
        drop(theme);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_autoplay_calls_without_configuration_are_noops() {
        let (mut theme, _bus) = theme(config(), 23);
        theme.start_autoplay();
        theme.pause_autoplay();
        assert_eq!(theme.autoplay_state(), AutoplayState::Stopped);
    }

    fn autoplay_config() -> GalleryConfig {
        GalleryConfig {
            autoplay_interval_ms: Some(1000),
            ..config()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_and_wraps() {
        let (mut theme, _bus) = theme(autoplay_config(), 23);
        assert_eq!(theme.autoplay_state(), AutoplayState::Running);

        sleep(Duration::from_millis(1001)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(1));

        sleep(Duration::from_millis(3000)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_after_destroy_is_ignored() {
        let (mut theme, _bus) = theme(autoplay_config(), 23);
        sleep(Duration::from_millis(1001)).await;
        assert!(!theme.inbox().is_empty(), "a tick should be queued");

        theme.destroy();
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));

        sleep(Duration::from_millis(5000)).await;
        assert!(theme.inbox().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_pauses_autoplay() {
        let (mut theme, bus) = theme(autoplay_config(), 23);
        sleep(Duration::from_millis(500)).await;
        bus.publish(GalleryEvent::PointerEntered);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Paused);

        sleep(Duration::from_millis(5000)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));

        bus.publish(GalleryEvent::PointerLeft);
        theme.dispatch_pending();
        sleep(Duration::from_millis(501)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_button_toggles_autoplay() {
        let config = GalleryConfig {
            navigation_type: NavigationType::Arrows,
            ..autoplay_config()
        };
        let (mut theme, bus) = theme(config, 23);

        bus.publish(GalleryEvent::Navigation(NavigationInput::PlayPause));
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Stopped);

        bus.publish(GalleryEvent::Navigation(NavigationInput::PlayPause));
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_restarts_autoplay_and_drops_stale_ticks() {
        let (mut theme, _bus) = theme(autoplay_config(), 23);
        sleep(Duration::from_millis(1001)).await;
        assert!(!theme.inbox().is_empty());

        // reload is applied ahead of the tick that is already queued
        assert!(theme.handle_event(GalleryEvent::ReloadStarted).is_continue());
        assert!(theme.handle_event(GalleryEvent::ReloadCompleted).is_continue());
        theme.dispatch_pending();

        assert_eq!(theme.snapshot().active_pane, Some(0));
        assert_eq!(theme.autoplay_state(), AutoplayState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_keeps_hover_pause() {
        let (mut theme, bus) = theme(autoplay_config(), 23);
        sleep(Duration::from_millis(500)).await;
        bus.publish(GalleryEvent::PointerEntered);
        bus.publish(GalleryEvent::ReloadStarted);
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Paused);

        sleep(Duration::from_millis(2500)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));

        bus.publish(GalleryEvent::PointerLeft);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Running);
        sleep(Duration::from_millis(1001)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_keeps_explicit_stop() {
        let (mut theme, bus) = theme(autoplay_config(), 23);
        theme.stop_autoplay();

        bus.publish(GalleryEvent::ReloadStarted);
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Stopped);

        sleep(Duration::from_millis(2500)).await;
        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_requests_during_reload_apply_afterwards() {
        let (mut theme, bus) = theme(autoplay_config(), 23);

        bus.publish(GalleryEvent::ReloadStarted);
        bus.publish(GalleryEvent::PointerEntered);
        theme.dispatch_pending();
        // the timer itself stays stopped until the items are back
        assert_eq!(theme.autoplay_state(), AutoplayState::Stopped);

        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Paused);

        bus.publish(GalleryEvent::ReloadStarted);
        theme.dispatch_pending();
        theme.stop_autoplay();
        theme.start_autoplay();
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();
        assert_eq!(theme.autoplay_state(), AutoplayState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reload_restores_pause() {
        let (mut theme, bus) = theme(autoplay_config(), 23);
        theme.pause_autoplay();

        bus.publish(GalleryEvent::ReloadStarted);
        theme.dispatch_pending();
        theme.surface_mut().width = f32::NAN;
        bus.publish(GalleryEvent::ReloadCompleted);
        theme.dispatch_pending();

        assert!(!theme.is_loading());
        assert_eq!(theme.autoplay_state(), AutoplayState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_in_same_batch_as_tick_keeps_pane_valid() {
        for width in [150.0, 600.0] {
            let (mut theme, bus) = theme(autoplay_config(), 23);
            theme.go_to_pane(3).unwrap();

            sleep(Duration::from_millis(1001)).await;
            bus.publish(GalleryEvent::Resized { width });
            theme.dispatch_pending();

            let snapshot = theme.snapshot();
            let active = snapshot.active_pane.unwrap();
            assert!(active < snapshot.total_panes, "width {width}: {snapshot:?}");
            assert_eq!(theme.navigation_state().highlighted, Some(active));
            assert_eq!(theme.navigation_state().control_count, snapshot.total_panes);
            assert_eq!(theme.surface().last_rendered().0, active);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamp_on_resize_then_queued_tick_wraps() {
        let (mut theme, _bus) = theme(autoplay_config(), 23);
        theme.go_to_pane(3).unwrap();
        sleep(Duration::from_millis(1001)).await;

        // the tick is still queued when the gallery widens to two panes
        assert!(theme.handle_event(GalleryEvent::Resized { width: 600.0 }).is_continue());
        assert_eq!(theme.snapshot().active_pane, Some(1));

        theme.dispatch_pending();
        assert_eq!(theme.snapshot().active_pane, Some(0));
        assert_eq!(theme.layout().total_panes(), 2);
        assert_eq!(theme.navigation_state().highlighted, Some(0));
        assert_eq!(theme.surface().last_rendered(), &(0, (0..12).collect()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_stops_on_shutdown() {
        let (mut theme, bus) = theme(config(), 23);
        bus.publish(GalleryEvent::Navigation(NavigationInput::Bullet(2)));
        bus.publish(GalleryEvent::Resized { width: 150.0 });
        bus.publish(GalleryEvent::Resized { width: 300.0 });
        bus.publish(GalleryEvent::Shutdown);

        theme.run().await;

        assert!(theme.is_destroyed());
        assert_eq!(theme.snapshot().active_pane, Some(2));
        assert_eq!(theme.layout().tiles_per_pane(), 6);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
