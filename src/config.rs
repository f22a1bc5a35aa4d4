//! Render configuration.
//!
//! Terminal capabilities are probed once at startup and never re-checked;
//! layout constants describe the fixed chrome around the class surface.

use serde::{Deserialize, Serialize};

/// Banner shown right-aligned in the header.
pub const DEFAULT_BANNER: &str = "NetBSD audio mixer";

/// What the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCaps {
    /// True bold is available; otherwise emphasis falls back to standout.
    pub bold: bool,
    /// Color pairs are available; otherwise `*` markers stand in for color.
    pub colors: bool,
}

impl Default for TermCaps {
    fn default() -> Self {
        Self {
            bold: true,
            colors: true,
        }
    }
}

impl TermCaps {
    /// No bold, no color: the most conservative terminal.
    pub const MONOCHROME: Self = Self {
        bold: false,
        colors: false,
    };

    /// Probe the environment.
    ///
    /// Colors need at least the eight curses colors and no `NO_COLOR`.
    /// Bold is assumed unless `TERM` names a terminal known to lack it.
    pub fn detect() -> Self {
        let term = std::env::var("TERM").unwrap_or_default();
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::from_env(&term, crossterm::style::available_color_count(), no_color)
    }

    fn from_env(term: &str, color_count: u16, no_color: bool) -> Self {
        let dumb = term.is_empty() || term == "dumb";
        let caps = Self {
            bold: !dumb && !term.starts_with("vt52"),
            colors: !dumb && !no_color && color_count >= 8,
        };
        tracing::debug!(term, color_count, ?caps, "probed terminal capabilities");
        caps
    }
}

/// Vertical layout of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum number of controls a class is laid out for. Each slot
    /// reserves [`LayoutConfig::SLOT_ROWS`] rows of the class surface.
    pub class_capacity: u16,
    /// Screen row where the class surface viewport begins.
    pub top_offset: u16,
    /// Screen rows kept free below the viewport.
    pub bottom_reserve: u16,
}

impl LayoutConfig {
    pub const SLOT_ROWS: u16 = 4;
    pub const HEADER_ROWS: u16 = 1;
    pub const CLASSBAR_ROWS: u16 = 2;

    /// Number of class-surface rows visible on a terminal `height` rows tall.
    pub fn viewport_rows(&self, height: u16) -> u16 {
        height
            .saturating_sub(self.bottom_reserve)
            .saturating_sub(self.top_offset)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            class_capacity: 32,
            top_offset: 3,
            bottom_reserve: 2,
        }
    }
}

/// Everything the panel needs to know about how to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub caps: TermCaps,
    pub layout: LayoutConfig,
    pub banner: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            caps: TermCaps::default(),
            layout: LayoutConfig::default(),
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

impl RenderConfig {
    /// Defaults with capabilities probed from the running terminal.
    pub fn detect() -> Self {
        Self {
            caps: TermCaps::detect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_from_env() {
        assert_eq!(
            TermCaps::from_env("xterm-256color", 256, false),
            TermCaps { bold: true, colors: true }
        );
        assert!(!TermCaps::from_env("xterm", 256, true).colors);
        assert!(!TermCaps::from_env("vt52", 0, false).bold);
        assert_eq!(TermCaps::from_env("dumb", 256, false), TermCaps::MONOCHROME);
    }

    #[test]
    fn test_viewport_rows() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.viewport_rows(24), 19);
        assert_eq!(layout.viewport_rows(4), 0);
    }

    #[test]
    fn test_render_config_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"layout": {"class_capacity": 8}, "banner": "mixer"}"#)
                .unwrap();
        assert_eq!(config.layout.class_capacity, 8);
        assert_eq!(config.layout.top_offset, 3);
        assert_eq!(config.banner, "mixer");
        assert_eq!(config.caps, TermCaps::default());
    }
}
