//! Mixer widgets.
//!
//! Each piece draws onto surfaces owned by the [`Mixer`](crate::Mixer)
//! context:
//!
//! - [`geometry`] - surface allocation and per-control regions
//! - [`control`] - one control's label and value
//! - [`frame`] - header, class bar and composition of the visible frame
//! - [`device_select`] - the list of available devices

use crate::config::TermCaps;
use crate::renderer::Pen;
use crate::theme::{ColorRole, Emphasis, Palette};

pub mod control;
pub mod device_select;
pub mod frame;
pub mod geometry;

pub use control::{BAR_CHROME, bar_fill, bar_width, render_control};
pub use device_select::draw_mixer_select;
pub use geometry::surface_rows;

/// Capabilities, palette and emphasis backend, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStyle {
    pub caps: TermCaps,
    pub palette: Palette,
    pub emphasis: Emphasis,
}

impl DrawStyle {
    pub fn new(caps: TermCaps) -> Self {
        Self {
            caps,
            palette: Palette::default(),
            emphasis: Emphasis::probe(&caps),
        }
    }

    pub fn with_palette(self, palette: Palette) -> Self {
        Self { palette, ..self }
    }

    /// Switch the pen to `role`'s pair, if the terminal has colors.
    pub(crate) fn color_on(&self, pen: &mut Pen<'_>, role: ColorRole) {
        if self.caps.colors {
            let pair = self.palette.pair(role);
            pen.color_on(pair.fg, pair.bg);
        }
    }

    pub(crate) fn color_off(&self, pen: &mut Pen<'_>) {
        if self.caps.colors {
            pen.color_off();
        }
    }
}

impl crate::Mixer {
    /// Replace the palette used by every widget.
    pub fn set_palette(&mut self, palette: Palette) {
        self.style = self.style.with_palette(palette);
    }
}
