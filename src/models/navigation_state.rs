use serde::Deserialize;

/// Which gallery theme drives the pane geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Multi-row grid split into pages.
    #[default]
    TilesGrid,
    /// Single horizontal strip; one pane is one screenful of tiles.
    Carousel,
}

/// Horizontal alignment used for the grid and for the navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationType {
    #[default]
    Bullets,
    Arrows,
    None,
}

/// Vertical position of the navigation relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPosition {
    Top,
    #[default]
    Bottom,
}

/// Step direction between adjacent panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What the navigation controls currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    /// One control per pane.
    pub control_count: usize,
    /// The highlighted bullet; arrows never highlight an index.
    pub highlighted: Option<usize>,
    /// False whenever there is at most one pane.
    pub visible: bool,
}

impl NavigationState {
    pub fn hidden(control_count: usize) -> Self {
        Self {
            control_count,
            highlighted: None,
            visible: false,
        }
    }
}
