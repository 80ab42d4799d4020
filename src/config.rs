//! Gallery configuration loaded from `gallery.toml`.
//!
//! Every recognized option is a field of [`GalleryConfig`]; unknown keys are
//! rejected while parsing. Values are checked by [`GalleryConfig::validate`]
//! before any gallery state is built.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::layout::{PlacementOptions, SizeEstimator};
use crate::models::tile_metrics::non_negative;
use crate::models::{Align, NavigationPosition, NavigationType, ThemeKind, TileMetrics};

const CONFIG_FILE: &str = "gallery.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub theme: ThemeKind,
    /// Horizontal padding between the container edge and the gallery.
    pub gallery_padding: f32,

    pub tile_width: f32,
    pub tile_height: f32,
    pub grid_padding: f32,
    pub space_between_cols: f32,
    pub space_between_rows: f32,
    /// Fixed column count; estimated from the width when absent.
    pub tiles_per_row: Option<u32>,
    /// Rows per pane; `0` fits as many rows as the items need.
    pub rows_per_pane: Option<u32>,
    /// Also the carousel alignment in the carousel theme.
    pub grid_align: Align,
    /// Offset of the grid from its aligned side (the carousel offset).
    pub grid_offset_hor: f32,

    pub navigation_type: NavigationType,
    pub navigation_align: Align,
    pub navigation_offset_hor: f32,
    pub navigation_position: NavigationPosition,
    /// Space between the grid and the bullets.
    pub bullets_margin_top: f32,
    pub bullets_space_between: f32,
    /// Space between the grid and the arrows; the carousel's navigation
    /// margin, since the carousel navigates with arrows.
    pub arrows_margin_top: f32,
    pub space_between_arrows: f32,
    /// Show a play/pause button between the arrows.
    pub navigation_enable_play: bool,

    /// Autoplay is created only when this is set.
    pub autoplay_interval_ms: Option<u64>,
    pub pause_on_hover: bool,
    /// Open the lightbox at this item after the first render.
    pub auto_open: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let metrics = TileMetrics::default();
        Self {
            theme: ThemeKind::TilesGrid,
            gallery_padding: 0.0,
            tile_width: metrics.tile_width,
            tile_height: metrics.tile_height,
            grid_padding: metrics.container_padding,
            space_between_cols: metrics.space_between_cols,
            space_between_rows: metrics.space_between_rows,
            tiles_per_row: None,
            rows_per_pane: Some(3),
            grid_align: Align::Center,
            grid_offset_hor: 0.0,
            navigation_type: NavigationType::Bullets,
            navigation_align: Align::Center,
            navigation_offset_hor: 0.0,
            navigation_position: NavigationPosition::Bottom,
            bullets_margin_top: 40.0,
            bullets_space_between: 12.0,
            arrows_margin_top: 20.0,
            space_between_arrows: 5.0,
            navigation_enable_play: true,
            autoplay_interval_ms: None,
            pause_on_hover: true,
            auto_open: None,
        }
    }
}

impl GalleryConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        debug!(?path, "Loaded gallery config");
        Ok(config)
    }

    /// Loads `gallery.toml` from the XDG config directory, falling back to
    /// defaults when the file does not exist.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `XDG_CONFIG_HOME/tilepanes/gallery.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tilepanes").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.tile_metrics().validate()?;
        non_negative("gallery_padding", self.gallery_padding)?;
        non_negative("bullets_margin_top", self.bullets_margin_top)?;
        non_negative("bullets_space_between", self.bullets_space_between)?;
        non_negative("arrows_margin_top", self.arrows_margin_top)?;
        non_negative("space_between_arrows", self.space_between_arrows)?;

        for (field, value) in [
            ("grid_offset_hor", self.grid_offset_hor),
            ("navigation_offset_hor", self.navigation_offset_hor),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.tiles_per_row == Some(0) {
            return Err(ConfigError::ZeroCount {
                field: "tiles_per_row",
            });
        }
        if self.autoplay_interval_ms == Some(0) {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn tile_metrics(&self) -> TileMetrics {
        TileMetrics {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            space_between_cols: self.space_between_cols,
            space_between_rows: self.space_between_rows,
            container_padding: self.grid_padding,
        }
    }

    /// Estimator for the configured theme; the carousel is always one row.
    pub fn size_estimator(&self) -> SizeEstimator {
        match self.theme {
            ThemeKind::TilesGrid => {
                SizeEstimator::new(self.tile_metrics(), self.tiles_per_row, self.rows_per_pane)
            }
            ThemeKind::Carousel => SizeEstimator::single_row(self.tile_metrics(), self.tiles_per_row),
        }
    }

    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions {
            gallery_padding: self.gallery_padding,
            grid_align: self.grid_align,
            grid_offset_hor: self.grid_offset_hor,
            navigation_align: self.navigation_align,
            navigation_offset_hor: self.navigation_offset_hor,
            navigation_position: self.navigation_position,
        }
    }

    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay_interval_ms.map(Duration::from_millis)
    }

    /// Width left for the grid once the gallery padding is removed.
    /// Negative or non-finite widths pass through so the layout rejects them.
    pub fn available_width(&self, container_width: f32) -> f32 {
        if !container_width.is_finite() || container_width < 0.0 {
            return container_width;
        }
        (container_width - self.gallery_padding * 2.0).max(0.0)
    }
}
