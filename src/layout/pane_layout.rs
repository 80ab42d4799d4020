use std::ops::Range;

use tracing::debug;

use crate::error::{GalleryError, Result};
use crate::layout::SizeEstimator;
use crate::models::Direction;

/// What a width change did to the pane structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relayout {
    /// Navigation controls must be rebuilt.
    pub pane_count_changed: bool,
    /// Visible tiles moved even if the pane count did not.
    pub tiles_per_pane_changed: bool,
    /// The active pane fell off the end and was pulled back.
    pub active_pane_clamped: bool,
}

impl Relayout {
    pub fn needs_render(&self) -> bool {
        self.pane_count_changed || self.tiles_per_pane_changed
    }
}

/// Read-only copy of the layout state handed to other components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneSnapshot {
    pub item_count: usize,
    pub container_width: f32,
    pub tiles_per_pane: usize,
    pub total_panes: usize,
    pub active_pane: Option<usize>,
}

/// Maps item indices onto fixed-size panes and owns the active pane index.
///
/// Slot `k` of pane `p` holds item `p * tiles_per_pane + k`. The active pane
/// is always a valid index while any pane exists; with no items every
/// navigation call is a silent no-op.
#[derive(Debug, Clone)]
pub struct PaneLayout {
    estimator: SizeEstimator,
    item_count: usize,
    container_width: f32,
    tiles_per_pane: usize,
    total_panes: usize,
    active_pane: usize,
}

impl PaneLayout {
    /// Creates an empty layout; call [`PaneLayout::initialize`] once the item
    /// count and container width are known.
    pub fn new(estimator: SizeEstimator) -> Self {
        let tiles_per_pane = estimator.tiles_per_pane(0.0);
        Self {
            estimator,
            item_count: 0,
            container_width: 0.0,
            tiles_per_pane,
            total_panes: 0,
            active_pane: 0,
        }
    }

    /// Lays out `item_count` items for `container_width` and selects pane 0.
    pub fn initialize(&mut self, item_count: usize, container_width: f32) -> Result<()> {
        let width = sanitize_width(container_width)?;
        let tiles_per_pane = self.estimator.tiles_per_pane(width);

        self.item_count = item_count;
        self.container_width = width;
        self.tiles_per_pane = tiles_per_pane;
        self.total_panes = item_count.div_ceil(tiles_per_pane);
        self.active_pane = 0;

        debug!(
            item_count,
            width,
            tiles_per_pane,
            total_panes = self.total_panes,
            "Pane layout initialized"
        );
        Ok(())
    }

    /// Re-estimates pane size for a new width, clamping the active pane if the
    /// pane count shrank. On error the previous state is kept as-is.
    pub fn recompute_for_width(&mut self, new_width: f32) -> Result<Relayout> {
        let width = sanitize_width(new_width)?;
        let tiles_per_pane = self.estimator.tiles_per_pane(width);
        let total_panes = self.item_count.div_ceil(tiles_per_pane);
        let active_pane = clamp_index(self.active_pane, total_panes);

        let relayout = Relayout {
            pane_count_changed: total_panes != self.total_panes,
            tiles_per_pane_changed: tiles_per_pane != self.tiles_per_pane,
            active_pane_clamped: active_pane != self.active_pane,
        };

        // All fields are committed together after every value is known.
        self.container_width = width;
        self.tiles_per_pane = tiles_per_pane;
        self.total_panes = total_panes;
        self.active_pane = active_pane;

        if relayout.needs_render() {
            debug!(
                width,
                tiles_per_pane,
                total_panes,
                active_pane,
                "Pane layout recomputed"
            );
        }
        Ok(relayout)
    }

    /// Jumps to `index`. Returns whether the active pane changed.
    ///
    /// An empty layout accepts any index and does nothing.
    pub fn go_to_pane(&mut self, index: usize) -> Result<bool> {
        if self.total_panes == 0 {
            return Ok(false);
        }
        if index >= self.total_panes {
            return Err(GalleryError::OutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                total_panes: self.total_panes,
            });
        }
        Ok(self.set_active(index))
    }

    /// Steps to the adjacent pane, wrapping at both ends.
    pub fn advance(&mut self, direction: Direction) -> bool {
        if self.total_panes == 0 {
            return false;
        }
        let last = self.total_panes - 1;
        let target = match direction {
            Direction::Next if self.active_pane >= last => 0,
            Direction::Next => self.active_pane + 1,
            Direction::Previous if self.active_pane == 0 => last,
            Direction::Previous => self.active_pane - 1,
        };
        self.set_active(target)
    }

    /// Scrolls by `tiles` items, carousel style: the pane holding the new
    /// first visible item becomes active. Wraps around the item set.
    pub fn scroll_tiles(&mut self, direction: Direction, tiles: usize) -> bool {
        if self.total_panes == 0 {
            return false;
        }
        let first = self.active_pane * self.tiles_per_pane;
        let shift = tiles % self.item_count;
        let target = match direction {
            Direction::Next => (first + shift) % self.item_count,
            Direction::Previous => (first + self.item_count - shift) % self.item_count,
        };
        match self.locate_item(target) {
            Some((pane, _)) => self.set_active(pane),
            None => false,
        }
    }

    fn set_active(&mut self, index: usize) -> bool {
        let changed = self.active_pane != index;
        self.active_pane = index;
        changed
    }

    /// Item indices shown on pane `index`, in slot order. The last pane may
    /// be short; panes past the end are empty.
    pub fn items_in_pane(&self, index: usize) -> Range<usize> {
        if index >= self.total_panes {
            return 0..0;
        }
        let start = index * self.tiles_per_pane;
        let end = (start + self.tiles_per_pane).min(self.item_count);
        start..end
    }

    /// Item shown at `slot` of `pane`, if that slot is filled.
    pub fn item_at(&self, pane: usize, slot: usize) -> Option<usize> {
        if slot >= self.tiles_per_pane {
            return None;
        }
        let range = self.items_in_pane(pane);
        let item = range.start + slot;
        range.contains(&item).then_some(item)
    }

    /// The `(pane, slot)` holding `item`.
    pub fn locate_item(&self, item: usize) -> Option<(usize, usize)> {
        if item >= self.item_count {
            return None;
        }
        Some((item / self.tiles_per_pane, item % self.tiles_per_pane))
    }

    pub fn active_pane(&self) -> Option<usize> {
        (self.total_panes > 0).then_some(self.active_pane)
    }

    pub fn total_panes(&self) -> usize {
        self.total_panes
    }

    pub fn tiles_per_pane(&self) -> usize {
        self.tiles_per_pane
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn estimator(&self) -> &SizeEstimator {
        &self.estimator
    }

    pub fn is_empty(&self) -> bool {
        self.total_panes == 0
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        PaneSnapshot {
            item_count: self.item_count,
            container_width: self.container_width,
            tiles_per_pane: self.tiles_per_pane,
            total_panes: self.total_panes,
            active_pane: self.active_pane(),
        }
    }
}

fn sanitize_width(value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GalleryError::InvalidWidth(value))
    }
}

fn clamp_index(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        index.min(count - 1)
    }
}
