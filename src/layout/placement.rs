//! Positions of the grid and its navigation inside the gallery container.

use crate::models::{Align, NavigationPosition};

/// Size of a navigation control group and its distance from the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationFootprint {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Alignment options that affect placement only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    pub gallery_padding: f32,
    pub grid_align: Align,
    /// Distance of the grid from the side it is aligned to.
    pub grid_offset_hor: f32,
    pub navigation_align: Align,
    pub navigation_offset_hor: f32,
    pub navigation_position: NavigationPosition,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            gallery_padding: 0.0,
            grid_align: Align::Center,
            grid_offset_hor: 0.0,
            navigation_align: Align::Center,
            navigation_offset_hor: 0.0,
            navigation_position: NavigationPosition::Bottom,
        }
    }
}

/// Final geometry handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub grid: Rect,
    /// `None` when the navigation is hidden or not configured.
    pub navigation: Option<Rect>,
    pub total_height: f32,
}

/// Offset of a child of `child_width` inside a parent of `parent_width`.
fn relative_x(align: Align, parent_width: f32, child_width: f32, offset: f32) -> f32 {
    match align {
        Align::Left => offset,
        Align::Center => (parent_width - child_width) / 2.0 + offset,
        Align::Right => parent_width - child_width - offset,
    }
}

/// Places the grid inside the container and the navigation relative to the
/// grid. Pass `navigation = None` when the controls are not shown.
pub fn compute_placement(
    container_width: f32,
    grid_width: f32,
    grid_height: f32,
    navigation: Option<NavigationFootprint>,
    options: &PlacementOptions,
) -> Placement {
    let grid_x = match options.grid_align {
        Align::Left => options.gallery_padding + options.grid_offset_hor,
        Align::Center => (container_width - grid_width) / 2.0 + options.grid_offset_hor,
        Align::Right => {
            container_width - grid_width - options.gallery_padding - options.grid_offset_hor
        }
    };

    let Some(nav) = navigation else {
        return Placement {
            grid: Rect {
                x: grid_x,
                y: 0.0,
                width: grid_width,
                height: grid_height,
            },
            navigation: None,
            total_height: grid_height,
        };
    };

    let (grid_y, nav_y) = match options.navigation_position {
        NavigationPosition::Top => (nav.height + nav.margin, 0.0),
        NavigationPosition::Bottom => (0.0, grid_height + nav.margin),
    };

    let nav_x = grid_x
        + relative_x(
            options.navigation_align,
            grid_width,
            nav.width,
            options.navigation_offset_hor,
        );

    let grid = Rect {
        x: grid_x,
        y: grid_y,
        width: grid_width,
        height: grid_height,
    };
    let nav_rect = Rect {
        x: nav_x,
        y: nav_y,
        width: nav.width,
        height: nav.height,
    };

    Placement {
        grid,
        navigation: Some(nav_rect),
        total_height: grid.bottom().max(nav_rect.bottom()),
    }
}
