//! Drawing a single control.
//!
//! A control's region looks like this on an 80-column terminal:
//!
//! ```text
//! *master
//! [200/255 **********************************************               ]
//! [180/255 ******************************************                   ]
//!
//! ```
//!
//! The first line is the label, prefixed by the selection marker. What
//! follows depends on the control kind: bracketed enumeration members,
//! `[*]`/`[ ]` set members, or one level bar per channel.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::mixer::{
    AUDIO_MAX_GAIN, Control, ControlDescriptor, ControlValue, EnumMember, Mixer, MixerTransport,
    SetMember,
};
use crate::renderer::Pen;
use crate::theme::{ColorRole, classify};

use super::DrawStyle;

/// Columns of a level line that are not bar: `[nnn/nnn `, `]` and one spare.
pub const BAR_CHROME: u16 = 11;

/// Width of the bar on a surface `surface_width` columns wide.
///
/// Zero on surfaces narrower than the chrome.
pub fn bar_width(surface_width: u16) -> usize {
    surface_width.saturating_sub(BAR_CHROME) as usize
}

/// Filled cells of a `bar`-wide bar for `level`.
pub fn bar_fill(level: u8, bar: usize) -> usize {
    level as usize * bar / AUDIO_MAX_GAIN as usize
}

impl Mixer {
    /// Read control `control` of class `class` and draw it into its region.
    ///
    /// The value is read from the device on every call. Read failures are
    /// returned as errors and are not retried.
    pub fn draw_control<T: MixerTransport>(
        &mut self,
        transport: &mut T,
        handle: &T::Handle,
        class: usize,
        control: usize,
        selected: bool,
    ) -> Result<()> {
        let style = self.style;
        let unlocked = self.selection.channels_unlocked;
        let class_ref = self
            .classes
            .get_mut(class)
            .ok_or(Error::UnknownClass(class))?;
        let ctrl = class_ref
            .controls
            .get(control)
            .ok_or(Error::UnknownControl { class, control })?;

        let value = transport.read_control_value(handle, ctrl.index, ctrl.descriptor.kind())?;
        trace!(index = ctrl.index, label = %ctrl.label, ?value, selected, "drawing control");

        let mut pen = class_ref.surface.region(ctrl.widget_y, ctrl.height);
        render_control(&mut pen, ctrl, &value, selected, unlocked, &style)
    }

    /// Draw every control of the active class, highlighting the selected one.
    pub fn draw_class<T: MixerTransport>(
        &mut self,
        transport: &mut T,
        handle: &T::Handle,
    ) -> Result<()> {
        let class = self.selection.class;
        let count = self
            .classes
            .get(class)
            .ok_or(Error::UnknownClass(class))?
            .controls
            .len();
        for control in 0..count {
            let selected = control == self.selection.control;
            self.draw_control(transport, handle, class, control, selected)?;
        }
        Ok(())
    }
}

/// Draw `control` with `value` into `pen`'s region.
///
/// `unlocked` is the selection's channels-unlocked flag. Fails if the value's
/// shape does not match the control's descriptor.
pub fn render_control(
    pen: &mut Pen<'_>,
    control: &Control,
    value: &ControlValue,
    selected: bool,
    unlocked: bool,
    style: &DrawStyle,
) -> Result<()> {
    let expected = control.descriptor.kind();
    if value.kind() != expected {
        return Err(Error::ValueMismatch {
            index: control.index,
            expected,
            got: value.kind(),
        });
    }

    pen.clear();
    draw_label(pen, &control.label, selected, style);

    match (&control.descriptor, value) {
        (ControlDescriptor::Enumeration { members }, ControlValue::Ordinal(ord)) => {
            draw_enum(pen, members, *ord, selected, style);
        }
        (ControlDescriptor::Set { members }, ControlValue::Mask(mask)) => {
            draw_set(pen, members, *mask, control.setindex, style);
        }
        (ControlDescriptor::Level { .. }, ControlValue::Levels(levels)) => {
            draw_levels(pen, levels, control.setindex, unlocked, selected, style);
        }
        // shapes were checked above
        _ => {}
    }
    Ok(())
}

fn draw_label(pen: &mut Pen<'_>, label: &str, selected: bool, style: &DrawStyle) {
    if selected {
        style.emphasis.emphasize(pen);
        style.color_on(pen, ColorRole::ControlSelected);
        pen.add_char('*');
        style.color_off(pen);
    } else {
        pen.add_char(' ');
    }
    pen.add_str(label);
    pen.add_char('\n');
    if selected {
        style.emphasis.de_emphasize(pen);
    }
}

fn draw_enum(pen: &mut Pen<'_>, members: &[EnumMember], ord: i32, selected: bool, style: &DrawStyle) {
    for (i, member) in members.iter().enumerate() {
        let active = member.ord == ord;
        if active && selected {
            style.emphasis.emphasize(pen);
        }
        pen.add_char('[');
        if active {
            if style.caps.colors {
                style.color_on(pen, classify(&member.label).role());
            } else {
                pen.add_char('*');
            }
        }
        pen.add_str(&member.label);
        if active {
            style.color_off(pen);
        }
        pen.add_char(']');
        if active && selected {
            style.emphasis.de_emphasize(pen);
        }
        if i + 1 != members.len() {
            pen.add_str(", ");
        }
    }
    pen.add_char('\n');
}

fn draw_set(pen: &mut Pen<'_>, members: &[SetMember], mask: u32, setindex: usize, style: &DrawStyle) {
    for (i, member) in members.iter().enumerate() {
        pen.add_char('[');
        if mask & member.mask != 0 {
            style.color_on(pen, ColorRole::SetSelected);
            pen.add_char('*');
            style.color_off(pen);
        } else {
            pen.add_char(' ');
        }
        pen.add_str("] ");

        let cursor = i == setindex;
        if cursor {
            style.emphasis.emphasize(pen);
        }
        pen.add_str(&member.label);
        if cursor {
            style.emphasis.de_emphasize(pen);
        }
        if i + 1 != members.len() {
            pen.add_str(", ");
        }
    }
    pen.add_char('\n');
}

fn draw_levels(
    pen: &mut Pen<'_>,
    levels: &[u8],
    setindex: usize,
    unlocked: bool,
    selected: bool,
    style: &DrawStyle,
) {
    let bar = bar_width(pen.width());
    if bar == 0 {
        debug!(width = pen.width(), "surface too narrow for level bars");
    }

    for (i, &level) in levels.iter().enumerate() {
        let emphasized = (selected && !unlocked) || (unlocked && setindex == i);
        if emphasized {
            style.emphasis.emphasize(pen);
        }
        pen.add_str(&format!("[{level:>3}/{AUDIO_MAX_GAIN:>3} "));

        let fill = bar_fill(level, bar);
        style.color_on(pen, ColorRole::Levels);
        pen.add_repeated('*', fill);
        style.color_off(pen);
        pen.add_repeated(' ', bar - fill);
        pen.add_str("]\n");

        if emphasized {
            style.emphasis.de_emphasize(pen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TermCaps;
    use crate::renderer::FrameBuffer;
    use crate::types::{Attr, Rgba};

    fn enum_control() -> Control {
        Control::new(
            3,
            "mute",
            ControlDescriptor::Enumeration {
                members: vec![
                    EnumMember { ord: 0, label: "off".into() },
                    EnumMember { ord: 1, label: "on".into() },
                    EnumMember { ord: 2, label: "auto".into() },
                ],
            },
        )
    }

    fn set_control(setindex: usize) -> Control {
        let mut c = Control::new(
            4,
            "record.source",
            ControlDescriptor::Set {
                members: vec![
                    SetMember { mask: 0x1, label: "mic".into() },
                    SetMember { mask: 0x2, label: "line".into() },
                    SetMember { mask: 0x4, label: "cd".into() },
                ],
            },
        );
        c.setindex = setindex;
        c
    }

    fn level_control(channels: u8, setindex: usize) -> Control {
        let mut c = Control::new(0, "master", ControlDescriptor::Level { channels });
        c.setindex = setindex;
        c
    }

    /// Render into a fresh buffer sized for the control and return it.
    fn render(
        width: u16,
        control: &Control,
        value: ControlValue,
        selected: bool,
        unlocked: bool,
        caps: TermCaps,
    ) -> FrameBuffer {
        let mut buf = FrameBuffer::new(width, control.descriptor.widget_height());
        let style = DrawStyle::new(caps);
        let mut pen = buf.pen();
        render_control(&mut pen, control, &value, selected, unlocked, &style).unwrap();
        buf
    }

    fn row(buf: &FrameBuffer, y: u16) -> String {
        buf.row_text(y).trim_end().to_string()
    }

    fn attrs_at(buf: &FrameBuffer, x: u16, y: u16) -> Attr {
        buf.get(x, y).unwrap().attrs
    }

    #[test]
    fn test_label_marker() {
        let c = enum_control();
        let buf = render(40, &c, ControlValue::Ordinal(0), false, false, TermCaps::default());
        assert_eq!(row(&buf, 0), " mute");
        assert_eq!(attrs_at(&buf, 1, 0), Attr::NONE);

        let buf = render(40, &c, ControlValue::Ordinal(0), true, false, TermCaps::default());
        assert_eq!(row(&buf, 0), "*mute");
        assert_eq!(attrs_at(&buf, 0, 0), Attr::BOLD);
        assert_eq!(attrs_at(&buf, 1, 0), Attr::BOLD);
        assert_eq!(buf.get(0, 0).unwrap().fg, DrawStyle::new(TermCaps::default()).palette.control_selected.fg);
        // label colors are not the marker's
        assert_eq!(buf.get(1, 0).unwrap().fg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_enum_with_colors() {
        let c = enum_control();
        let buf = render(40, &c, ControlValue::Ordinal(1), false, false, TermCaps::default());
        assert_eq!(row(&buf, 1), "[off], [on], [auto]");

        let palette = DrawStyle::new(TermCaps::default()).palette;
        // "on" starts at column 8
        assert_eq!(buf.get(8, 1).unwrap().bg, palette.enum_on.bg);
        assert_eq!(buf.get(9, 1).unwrap().bg, palette.enum_on.bg);
        assert_eq!(buf.get(10, 1).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buf.get(1, 1).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_enum_color_follows_member_name() {
        let c = enum_control();
        let palette = DrawStyle::new(TermCaps::default()).palette;
        let buf = render(40, &c, ControlValue::Ordinal(0), false, false, TermCaps::default());
        assert_eq!(buf.get(1, 1).unwrap().bg, palette.enum_off.bg);
        let buf = render(40, &c, ControlValue::Ordinal(2), false, false, TermCaps::default());
        assert_eq!(buf.get(14, 1).unwrap().bg, palette.enum_misc.bg);
    }

    #[test]
    fn test_enum_without_colors_marks_active_member() {
        let c = enum_control();
        let buf = render(40, &c, ControlValue::Ordinal(2), false, false, TermCaps::MONOCHROME);
        let line = row(&buf, 1);
        assert_eq!(line, "[off], [on], [*auto]");
        assert_eq!(line.matches('*').count(), 1);
        assert!(!line.ends_with(", "));
    }

    #[test]
    fn test_enum_selected_emphasizes_active_token_only() {
        let c = enum_control();
        let buf = render(40, &c, ControlValue::Ordinal(1), true, false, TermCaps::MONOCHROME);
        assert_eq!(row(&buf, 1), "[off], [*on], [auto]");
        // "[off]" plain, "[*on]" in standout including both brackets
        assert_eq!(attrs_at(&buf, 0, 1), Attr::NONE);
        for x in 7..12 {
            assert_eq!(attrs_at(&buf, x, 1), Attr::INVERSE, "column {x}");
        }
        assert_eq!(attrs_at(&buf, 12, 1), Attr::NONE);
    }

    #[test]
    fn test_enum_unknown_ordinal_marks_nothing() {
        let c = enum_control();
        let buf = render(40, &c, ControlValue::Ordinal(9), false, false, TermCaps::MONOCHROME);
        assert_eq!(row(&buf, 1), "[off], [on], [auto]");
    }

    #[test]
    fn test_set_marks_present_members() {
        let c = set_control(1);
        let buf = render(60, &c, ControlValue::Mask(0x5 | 0x100), false, false, TermCaps::default());
        let line = row(&buf, 1);
        assert_eq!(line, "[*] mic, [ ] line, [*] cd");
        assert_eq!(line.matches("[*]").count(), (0x105u32 & 0x7).count_ones() as usize);
    }

    #[test]
    fn test_set_cursor_emphasis_is_independent_of_mask() {
        let c = set_control(1);
        let buf = render(60, &c, ControlValue::Mask(0x1), false, false, TermCaps::default());
        // "line" starts at column 13 and is not in the mask
        assert_eq!(attrs_at(&buf, 13, 1), Attr::BOLD);
        assert_eq!(attrs_at(&buf, 16, 1), Attr::BOLD);
        assert_eq!(attrs_at(&buf, 4, 1), Attr::NONE);
        assert_eq!(attrs_at(&buf, 17, 1), Attr::NONE);
    }

    #[test]
    fn test_set_star_colored() {
        let c = set_control(0);
        let palette = DrawStyle::new(TermCaps::default()).palette;
        let buf = render(60, &c, ControlValue::Mask(0x1), false, false, TermCaps::default());
        assert_eq!(buf.get(1, 1).unwrap().bg, palette.set_selected.bg);
        assert_eq!(buf.get(0, 1).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_level_zero_is_empty_bar() {
        let c = level_control(1, 0);
        let buf = render(40, &c, ControlValue::Levels(vec![0]), false, false, TermCaps::default());
        let line = buf.row_text(1);
        assert_eq!(line, format!("[  0/255 {}] ", " ".repeat(29)));
        assert_eq!(line.matches('*').count(), 0);
    }

    #[test]
    fn test_level_max_is_full_bar() {
        let c = level_control(1, 0);
        let buf = render(40, &c, ControlValue::Levels(vec![255]), false, false, TermCaps::default());
        assert_eq!(buf.row_text(1), format!("[255/255 {}] ", "*".repeat(29)));
        let palette = DrawStyle::new(TermCaps::default()).palette;
        assert_eq!(buf.get(9, 1).unwrap().fg, palette.levels.fg);
        assert_eq!(buf.get(38, 1).unwrap().fg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_level_proportional_fill() {
        let c = level_control(2, 0);
        let buf = render(80, &c, ControlValue::Levels(vec![128, 64]), false, false, TermCaps::default());
        assert_eq!(buf.row_text(1).matches('*').count(), 128 * 69 / 255);
        assert_eq!(buf.row_text(2).matches('*').count(), 64 * 69 / 255);
        assert!(buf.row_text(1).starts_with("[128/255 "));
        assert!(buf.row_text(2).starts_with("[ 64/255 "));
    }

    #[test]
    fn test_level_emphasis_locked() {
        let c = level_control(2, 1);
        let buf = render(40, &c, ControlValue::Levels(vec![10, 20]), true, false, TermCaps::default());
        assert_eq!(attrs_at(&buf, 0, 1), Attr::BOLD);
        assert_eq!(attrs_at(&buf, 0, 2), Attr::BOLD);

        let buf = render(40, &c, ControlValue::Levels(vec![10, 20]), false, false, TermCaps::default());
        assert_eq!(attrs_at(&buf, 0, 1), Attr::NONE);
        assert_eq!(attrs_at(&buf, 0, 2), Attr::NONE);
    }

    #[test]
    fn test_level_emphasis_unlocked_follows_cursor() {
        let c = level_control(2, 1);
        let buf = render(40, &c, ControlValue::Levels(vec![10, 20]), true, true, TermCaps::default());
        assert_eq!(attrs_at(&buf, 0, 1), Attr::NONE);
        assert_eq!(attrs_at(&buf, 0, 2), Attr::BOLD);
        assert_eq!(attrs_at(&buf, 38, 2), Attr::BOLD);
    }

    #[test]
    fn test_level_narrow_surface_degrades() {
        assert_eq!(bar_width(8), 0);
        assert_eq!(bar_width(11), 0);
        assert_eq!(bar_width(12), 1);
        assert_eq!(bar_fill(255, 0), 0);

        let c = level_control(1, 0);
        let buf = render(8, &c, ControlValue::Levels(vec![255]), false, false, TermCaps::default());
        for y in 1..buf.height() {
            assert_eq!(buf.row_text(y).matches('*').count(), 0);
        }
        assert_eq!(row(&buf, 1), "[255/255");
    }

    #[test]
    fn test_value_shape_mismatch() {
        let c = level_control(2, 0);
        let mut buf = FrameBuffer::new(40, 4);
        let style = DrawStyle::new(TermCaps::default());
        let err = render_control(&mut buf.pen(), &c, &ControlValue::Levels(vec![1]), false, false, &style)
            .unwrap_err();
        assert!(matches!(err, Error::ValueMismatch { index: 0, .. }));
        let err = render_control(&mut buf.pen(), &c, &ControlValue::Mask(1), false, false, &style)
            .unwrap_err();
        assert!(matches!(err, Error::ValueMismatch { .. }));
    }

    #[test]
    fn test_redraw_clears_previous_content() {
        let c = enum_control();
        let mut buf = FrameBuffer::new(40, 3);
        let style = DrawStyle::new(TermCaps::MONOCHROME);
        render_control(&mut buf.pen(), &c, &ControlValue::Ordinal(2), false, false, &style).unwrap();
        render_control(&mut buf.pen(), &c, &ControlValue::Ordinal(0), false, false, &style).unwrap();
        assert_eq!(row(&buf, 1), "[*off], [on], [auto]");
    }
}
