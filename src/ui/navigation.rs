// Pane navigation controls.
//
// Indicators only translate raw user input into navigation requests and
// mirror the layout's state. They never move the active pane themselves:
// - Bullets: one control per pane, the active one highlighted
// - Arrows: previous/next buttons, optional play/pause button

use crate::config::GalleryConfig;
use crate::layout::NavigationFootprint;
use crate::models::{Direction, NavigationState, NavigationType};

/// Bullet diameter in pixels.
const BULLET_SIZE: f32 = 15.0;

/// Arrow and play button size in pixels.
const ARROW_BUTTON_SIZE: f32 = 30.0;

/// Raw user gesture on a navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationInput {
    Bullet(usize),
    Arrow(Direction),
    PlayPause,
}

/// What the user asked the layout to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    Pane(usize),
    Step(Direction),
    ToggleAutoplay,
}

/// Shared capability set of the bullets and arrows controls.
pub trait NavigationIndicator: std::fmt::Debug {
    fn kind(&self) -> NavigationType;

    /// Rebuilds the controls for the layout's current pane state.
    fn sync(&mut self, total_panes: usize, active_pane: usize);

    /// Shows or hides the controls; they stay hidden with a single pane.
    fn set_visible(&mut self, visible: bool);

    fn state(&self) -> NavigationState;

    /// Maps a gesture to a request, or `None` if this control ignores it.
    fn interpret(&self, input: NavigationInput) -> Option<NavigationRequest>;

    fn footprint(&self) -> NavigationFootprint;

    /// Mirrors the autoplay state on controls that show it.
    fn set_playing(&mut self, _playing: bool) {}
}

/// Builds the indicator selected by `navigation_type`, if any.
pub fn indicator_for(config: &GalleryConfig) -> Option<Box<dyn NavigationIndicator>> {
    match config.navigation_type {
        NavigationType::Bullets => Some(Box::new(BulletsIndicator::new(
            config.bullets_space_between,
            config.bullets_margin_top,
        ))),
        NavigationType::Arrows => Some(Box::new(ArrowsIndicator::new(
            config.space_between_arrows,
            config.arrows_margin_top,
            config.navigation_enable_play,
        ))),
        NavigationType::None => None,
    }
}

#[derive(Debug, Clone)]
pub struct BulletsIndicator {
    count: usize,
    active: usize,
    shown: bool,
    space_between: f32,
    margin: f32,
}

impl BulletsIndicator {
    pub fn new(space_between: f32, margin: f32) -> Self {
        Self {
            count: 0,
            active: 0,
            shown: true,
            space_between,
            margin,
        }
    }

    pub fn is_highlighted(&self, bullet: usize) -> bool {
        self.count > 0 && bullet == self.active
    }
}

impl NavigationIndicator for BulletsIndicator {
    fn kind(&self) -> NavigationType {
        NavigationType::Bullets
    }

    fn sync(&mut self, total_panes: usize, active_pane: usize) {
        self.count = total_panes;
        self.active = if total_panes == 0 {
            0
        } else {
            active_pane.min(total_panes - 1)
        };
    }

    fn set_visible(&mut self, visible: bool) {
        self.shown = visible;
    }

    fn state(&self) -> NavigationState {
        NavigationState {
            control_count: self.count,
            highlighted: (self.count > 0).then_some(self.active),
            visible: self.shown && self.count > 1,
        }
    }

    fn interpret(&self, input: NavigationInput) -> Option<NavigationRequest> {
        match input {
            NavigationInput::Bullet(index) if index < self.count => {
                Some(NavigationRequest::Pane(index))
            }
            _ => None,
        }
    }

    fn footprint(&self) -> NavigationFootprint {
        let count = self.count as f32;
        let gaps = self.count.saturating_sub(1) as f32;
        NavigationFootprint {
            width: count * BULLET_SIZE + gaps * self.space_between,
            height: BULLET_SIZE,
            margin: self.margin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrowsIndicator {
    count: usize,
    shown: bool,
    play_button: bool,
    playing: bool,
    space_between: f32,
    margin: f32,
}

impl ArrowsIndicator {
    pub fn new(space_between: f32, margin: f32, play_button: bool) -> Self {
        Self {
            count: 0,
            shown: true,
            play_button,
            playing: false,
            space_between,
            margin,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl NavigationIndicator for ArrowsIndicator {
    fn kind(&self) -> NavigationType {
        NavigationType::Arrows
    }

    fn sync(&mut self, total_panes: usize, _active_pane: usize) {
        self.count = total_panes;
    }

    fn set_visible(&mut self, visible: bool) {
        self.shown = visible;
    }

    fn state(&self) -> NavigationState {
        NavigationState {
            control_count: self.count,
            highlighted: None,
            visible: self.shown && self.count > 1,
        }
    }

    fn interpret(&self, input: NavigationInput) -> Option<NavigationRequest> {
        match input {
            NavigationInput::Arrow(direction) => Some(NavigationRequest::Step(direction)),
            NavigationInput::PlayPause if self.play_button => Some(NavigationRequest::ToggleAutoplay),
            _ => None,
        }
    }

    fn footprint(&self) -> NavigationFootprint {
        let buttons = if self.play_button { 3.0 } else { 2.0 };
        NavigationFootprint {
            width: buttons * ARROW_BUTTON_SIZE + (buttons - 1.0) * self.space_between,
            height: ARROW_BUTTON_SIZE,
            margin: self.margin,
        }
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }
}
