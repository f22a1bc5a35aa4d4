//! Header, class bar, and composition of the visible frame.
//!
//! The visible frame is stacked like this:
//!
//! ```text
//! row 0            header         hdafg0 1.0          NetBSD audio mixer
//! rows 1-2         class bar      [1:*outputs] [2:inputs] [3:record]
//! rows 3..=h-3     viewport       scrolled window of the active class surface
//! rows h-2..h      base screen    left to the caller (help, status)
//! ```
//!
//! Header and class bar can be drawn in any order, any number of times,
//! before [`Mixer::present`].

use std::io::Write;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::mixer::Mixer;
use crate::renderer::{DiffRenderer, FrameBuffer};
use crate::theme::ColorRole;
use crate::types::{Attr, ClipRect, Rgba};

impl Mixer {
    /// Device name (and version) on the left, banner right-aligned.
    ///
    /// The device text is clipped so it never runs into the banner.
    pub fn draw_header(&mut self) {
        let fg = Rgba::TERMINAL_DEFAULT;
        let bg = Rgba::TERMINAL_DEFAULT;

        self.header.clear();
        let banner_x = self.header.draw_text_right(0, &self.banner, fg, bg, Attr::NONE);

        let device = if self.device.version.is_empty() {
            self.device.name.clone()
        } else {
            format!("{} {}", self.device.name, self.device.version)
        };
        let clip = ClipRect::new(0, 0, banner_x.saturating_sub(1), 1);
        self.header.draw_text(0, 0, &device, fg, bg, Attr::NONE, Some(&clip));
    }

    /// One `[n:name]` tab per class, numbered from 1, current one emphasized.
    pub fn draw_classbar(&mut self) {
        let style = self.style;
        let current = self.selection.class;

        let mut pen = self.classbar.pen();
        pen.clear();
        for (i, class) in self.classes.iter().enumerate() {
            let active = i == current;
            if active {
                style.emphasis.emphasize(&mut pen);
            }
            pen.add_str(&format!("[{}:", i + 1));
            if active {
                style.color_on(&mut pen, ColorRole::ControlSelected);
                pen.add_char('*');
                style.color_off(&mut pen);
            }
            pen.add_str(&class.name);
            if active {
                style.emphasis.de_emphasize(&mut pen);
            }
            pen.add_str("] ");
        }
        pen.add_str("\n\n");
    }

    /// The frame as it should appear on the terminal.
    ///
    /// Only the active class is shown; the others keep whatever was last
    /// drawn on their surfaces.
    pub fn compose(&self) -> FrameBuffer {
        let mut frame = self.screen.clone();
        frame.blit(&self.header, 0, 0, LayoutConfig::HEADER_ROWS);
        frame.blit(&self.classbar, 0, LayoutConfig::HEADER_ROWS, LayoutConfig::CLASSBAR_ROWS);

        if let Some(class) = self.active_class() {
            frame.blit(
                &class.surface,
                class.scroll_y,
                self.layout.top_offset,
                self.viewport_rows(),
            );
        }
        frame
    }

    /// Compose the frame and commit it to `out` in one synchronized update.
    ///
    /// Returns true if anything on screen changed.
    pub fn present<W: Write>(&self, renderer: &mut DiffRenderer, out: &mut W) -> Result<bool> {
        Ok(renderer.render(&self.compose(), out)?)
    }

    /// Commit only the base screen, e.g. while the device list is shown.
    pub fn present_screen<W: Write>(&self, renderer: &mut DiffRenderer, out: &mut W) -> Result<bool> {
        Ok(renderer.render(&self.screen, out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderConfig, TermCaps};
    use crate::mixer::{Control, ControlDescriptor, DeviceIdentity, MixerClass};

    fn mixer(version: &str, caps: TermCaps) -> Mixer {
        let config = RenderConfig {
            caps,
            ..RenderConfig::default()
        };
        let device = DeviceIdentity {
            name: "hdafg0".into(),
            version: version.into(),
            config: "hdafg".into(),
        };
        let classes = vec![
            MixerClass::new("outputs", vec![Control::new(0, "master", ControlDescriptor::Level { channels: 2 })]),
            MixerClass::new("inputs", vec![]),
        ];
        Mixer::new(device, classes, &config)
    }

    #[test]
    fn test_header_banner_right_aligned() {
        let mut m = mixer("1.0", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.draw_header();
        let row = m.header().row_text(0);
        assert!(row.ends_with("NetBSD audio mixer"));
        assert!(row.starts_with("hdafg0 1.0 "));
    }

    #[test]
    fn test_header_without_version() {
        let mut m = mixer("", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.draw_header();
        assert!(m.header().row_text(0).starts_with("hdafg0 "));
        assert_eq!(m.header().row_text(0).trim_end().len(), 40);
    }

    #[test]
    fn test_header_device_text_never_covers_banner() {
        let mut m = mixer("", TermCaps::default());
        m.device.name = "a-very-long-device-name".into();
        m.create_widgets(30, 12).unwrap();
        m.draw_header();
        let row = m.header().row_text(0);
        assert!(row.ends_with(" NetBSD audio mixer"));
        assert!(row.starts_with("a-very-long"));
    }

    #[test]
    fn test_header_is_idempotent() {
        let mut m = mixer("1.0", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.draw_header();
        let first = m.header().clone();
        m.draw_header();
        assert_eq!(m.header(), &first);
    }

    #[test]
    fn test_classbar_numbering_and_marker() {
        let mut m = mixer("", TermCaps::default());
        m.create_widgets(60, 12).unwrap();
        m.selection.class = 1;
        m.draw_classbar();
        assert_eq!(m.classbar().row_text(0).trim_end(), "[1:outputs] [2:*inputs]");
        // "[2:" of the current class is bold, "[1:" is not
        assert_eq!(m.classbar().get(0, 0).unwrap().attrs, Attr::NONE);
        assert_eq!(m.classbar().get(12, 0).unwrap().attrs, Attr::BOLD);
        // closing bracket of the current class is past the emphasis
        assert_eq!(m.classbar().get(22, 0).unwrap().attrs, Attr::NONE);
        let marker = m.classbar().get(15, 0).unwrap();
        assert_eq!(marker.char, '*' as u32);
        assert_eq!(marker.fg, m.style().palette.control_selected.fg);
    }

    #[test]
    fn test_classbar_redraw_moves_marker() {
        let mut m = mixer("", TermCaps::MONOCHROME);
        m.create_widgets(60, 12).unwrap();
        m.draw_classbar();
        m.selection.class = 1;
        m.draw_classbar();
        assert_eq!(m.classbar().row_text(0).trim_end(), "[1:outputs] [2:*inputs]");
        assert_eq!(m.classbar().get(12, 0).unwrap().attrs, Attr::INVERSE);
    }

    #[test]
    fn test_compose_places_surfaces() {
        let mut m = mixer("1.0", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.draw_header();
        m.draw_classbar();
        m.classes[0].surface.pen().add_str("row0\nrow1\nrow2\nrow3\nrow4\nrow5\nrow6\nrow7\nrow8");
        m.screen_mut().draw_text(0, 11, "q: quit", Rgba::TERMINAL_DEFAULT, Rgba::TERMINAL_DEFAULT, Attr::NONE, None);

        let frame = m.compose();
        assert_eq!(frame.width(), 40);
        assert_eq!(frame.height(), 12);
        assert!(frame.row_text(0).ends_with("NetBSD audio mixer"));
        assert!(frame.row_text(1).starts_with("[1:*outputs]"));
        // viewport is rows 3..=9 on a 12-row terminal
        assert_eq!(m.viewport_rows(), 7);
        assert!(frame.row_text(3).starts_with("row0"));
        assert!(frame.row_text(9).starts_with("row6"));
        assert_eq!(frame.row_text(10).trim_end(), "");
        assert_eq!(frame.row_text(11).trim_end(), "q: quit");
    }

    #[test]
    fn test_compose_respects_scroll() {
        let mut m = mixer("", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.classes[0].surface.pen().add_str("row0\nrow1\nrow2\nrow3");
        m.classes[0].scroll_y = 2;
        let frame = m.compose();
        assert!(frame.row_text(3).starts_with("row2"));
        assert!(frame.row_text(4).starts_with("row3"));
    }

    #[test]
    fn test_compose_shows_only_active_class() {
        let mut m = mixer("", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.classes[0].surface.pen().add_str("outputs-content");
        m.classes[1].surface.pen().add_str("inputs-content");

        assert!(m.compose().row_text(3).starts_with("outputs-content"));
        m.selection.class = 1;
        assert!(m.compose().row_text(3).starts_with("inputs-content"));
        m.selection.class = 0;
        assert!(m.compose().row_text(3).starts_with("outputs-content"));
    }

    #[test]
    fn test_present_commits_once() {
        let mut m = mixer("1.0", TermCaps::default());
        m.create_widgets(40, 12).unwrap();
        m.draw_header();
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        assert!(m.present(&mut renderer, &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\x1b[?2026h").count(), 1);
        assert!(text.contains("NetBSD audio mixer"));

        let mut out = Vec::new();
        assert!(!m.present(&mut renderer, &mut out).unwrap());
    }
}
