//! Interaction policy knobs.
//!
//! Every timing and pixel threshold the kernel uses lives in [`UiConfig`]. None
//! of them are correctness contracts: they tune feel. A TOML file may set any
//! subset of fields, the rest keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::UiError;

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Ui`](crate::app::Ui).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Open nested menus automatically when the pointer rests on them.
    pub auto_open: bool,
    /// Auto-open delay inside popups.
    pub menu_auto_open_delay_ms: u64,
    /// Auto-open delay for menu widgets in persistent blocks.
    pub auto_open_delay_ms: u64,
    /// Show tooltips at all.
    pub tooltips: bool,
    /// Rest time over a widget before its tooltip appears.
    pub tooltip_delay_ms: u64,
    /// How long pointer motion toward a popup keeps it open once outside.
    pub towards_budget_ms: u64,
    /// Minimum motion before a direction is judged.
    pub towards_threshold_px: i32,
    /// Vertical slack added to the popup corners for the direction test.
    pub towards_corner_slack_px: i32,
    /// Margin around a popup (and its parent widget) where the pointer is still "inside".
    pub safety_margin_px: i32,
    /// Horizontal motion needed before a number field starts dragging.
    pub drag_lock_px: i32,
    /// Pixels of drag that sweep a float number field across its whole range.
    pub number_drag_divisor: f32,
    /// Panel positions snap to multiples of this.
    pub panel_grid: i32,
    /// Gap between aligned panels.
    pub panel_gap: i32,
    /// Height (vertical) or width (horizontal) of a panel header.
    pub panel_header: i32,
    /// Length of the collapse/expand animation.
    pub panel_animation_ms: u64,
    /// Fraction of a panel's size used as overlap tolerance when merging tabs.
    pub overlap_safe: f32,
    /// Tolerance on the collapsed axis of a closed panel.
    pub overlap_safe_closed: f32,
    /// Cell size of the stow packing strip.
    pub stow_cell: i32,
    /// Pointer distance at which a connector line counts as hovered.
    pub link_hover_px: i32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            auto_open: true,
            menu_auto_open_delay_ms: 250,
            auto_open_delay_ms: 500,
            tooltips: true,
            tooltip_delay_ms: 500,
            towards_budget_ms: 1000,
            towards_threshold_px: 4,
            towards_corner_slack_px: 20,
            safety_margin_px: 40,
            drag_lock_px: 3,
            number_drag_divisor: 500.0,
            panel_grid: 4,
            panel_gap: 8,
            panel_header: 20,
            panel_animation_ms: 200,
            overlap_safe: 0.2,
            overlap_safe_closed: 0.05,
            stow_cell: 32,
            link_hover_px: 4,
        }
    }
}

impl UiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, UiError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UiError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded ui config");
        Ok(config)
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_auto_open(mut self, enabled: bool) -> Self {
        self.auto_open = enabled;
        self
    }

    pub fn with_menu_auto_open_delay(mut self, ms: u64) -> Self {
        self.menu_auto_open_delay_ms = ms;
        self
    }

    pub fn with_auto_open_delay(mut self, ms: u64) -> Self {
        self.auto_open_delay_ms = ms;
        self
    }

    pub fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips = enabled;
        self
    }

    pub fn with_tooltip_delay(mut self, ms: u64) -> Self {
        self.tooltip_delay_ms = ms;
        self
    }

    pub fn with_towards_budget(mut self, ms: u64) -> Self {
        self.towards_budget_ms = ms;
        self
    }

    pub fn with_safety_margin(mut self, px: i32) -> Self {
        self.safety_margin_px = px;
        self
    }

    pub fn with_panel_grid(mut self, grid: i32) -> Self {
        self.panel_grid = grid;
        self
    }

    pub fn with_panel_gap(mut self, gap: i32) -> Self {
        self.panel_gap = gap;
        self
    }

    pub fn with_panel_animation(mut self, ms: u64) -> Self {
        self.panel_animation_ms = ms;
        self
    }

    // ── Derived durations ────────────────────────────────────────────

    /// Auto-open delay for a block, depending on whether it is a popup.
    pub fn auto_open_delay(&self, in_popup: bool) -> Duration {
        if in_popup {
            Duration::from_millis(self.menu_auto_open_delay_ms)
        } else {
            Duration::from_millis(self.auto_open_delay_ms)
        }
    }

    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.tooltip_delay_ms)
    }

    pub fn towards_budget(&self) -> Duration {
        Duration::from_millis(self.towards_budget_ms)
    }

    pub fn panel_animation(&self) -> Duration {
        Duration::from_millis(self.panel_animation_ms)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
