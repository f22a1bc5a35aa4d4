//! Cursor-based writer over a band of rows.
//!
//! A `Pen` behaves like a curses window: it carries a cursor, a current
//! attribute set and a current color pair, and text written through it flows
//! left to right, wrapping at the buffer's right edge. It is confined to the
//! rows it was created for, so a control can never draw into its neighbour's
//! region. Output past the last row is dropped.

use crate::types::{Attr, Rgba};

use super::buffer::{FrameBuffer, char_width};

/// Writer over rows `top..top + rows` of a [`FrameBuffer`].
#[derive(Debug)]
pub struct Pen<'a> {
    buf: &'a mut FrameBuffer,
    top: u16,
    rows: u16,
    x: u16,
    y: u16,
    attrs: Attr,
    fg: Rgba,
    bg: Rgba,
}

impl<'a> Pen<'a> {
    pub(crate) fn new(buf: &'a mut FrameBuffer, top: u16, rows: u16) -> Self {
        let top = top.min(buf.height());
        let rows = rows.min(buf.height() - top);
        Self {
            buf,
            top,
            rows,
            x: 0,
            y: 0,
            attrs: Attr::NONE,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
        }
    }

    /// Width of the underlying buffer.
    #[inline]
    pub fn width(&self) -> u16 {
        self.buf.width()
    }

    /// Number of rows this pen may write to.
    #[inline]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Cursor position relative to the band.
    #[inline]
    pub fn cursor(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Blank the band and home the cursor.
    pub fn clear(&mut self) {
        self.buf.clear_rows(self.top, self.rows);
        self.x = 0;
        self.y = 0;
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    // =========================================================================
    // Attribute state
    // =========================================================================

    /// Attributes currently applied to written text.
    #[inline]
    pub fn attrs(&self) -> Attr {
        self.attrs
    }

    pub fn attr_on(&mut self, attr: Attr) {
        self.attrs |= attr;
    }

    pub fn attr_off(&mut self, attr: Attr) {
        self.attrs &= !attr;
    }

    /// Current foreground and background.
    #[inline]
    pub fn colors(&self) -> (Rgba, Rgba) {
        (self.fg, self.bg)
    }

    pub fn color_on(&mut self, fg: Rgba, bg: Rgba) {
        self.fg = fg;
        self.bg = bg;
    }

    pub fn color_off(&mut self) {
        self.fg = Rgba::TERMINAL_DEFAULT;
        self.bg = Rgba::TERMINAL_DEFAULT;
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Write one character at the cursor and advance.
    ///
    /// `'\n'` moves to the start of the next row. Returns false once the
    /// cursor has left the band.
    pub fn add_char(&mut self, ch: char) -> bool {
        if self.y >= self.rows {
            return false;
        }
        if ch == '\n' {
            self.x = 0;
            self.y += 1;
            return true;
        }

        let width = self.buf.width();
        let w = char_width(ch) as u16;
        if w == 0 || width == 0 {
            return true;
        }
        if self.x.saturating_add(w) > width {
            self.x = 0;
            self.y += 1;
            if self.y >= self.rows {
                return false;
            }
        }

        let row = self.top + self.y;
        self.buf
            .set_cell(self.x, row, ch as u32, self.fg, self.bg, self.attrs, None);
        if w == 2 {
            self.buf
                .set_cell(self.x + 1, row, 0, self.fg, self.bg, self.attrs, None);
        }

        self.x += w;
        if self.x >= width {
            self.x = 0;
            self.y += 1;
        }
        true
    }

    /// Write a string at the cursor.
    pub fn add_str(&mut self, text: &str) {
        for ch in text.chars() {
            if !self.add_char(ch) {
                break;
            }
        }
    }

    /// Write `n` copies of `ch`.
    pub fn add_repeated(&mut self, ch: char, n: usize) {
        for _ in 0..n {
            if !self.add_char(ch) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_wraps_at_width() {
        let mut buf = FrameBuffer::new(4, 3);
        let mut pen = buf.pen();
        pen.add_str("abcdef");
        assert_eq!(pen.cursor(), (2, 1));
        assert_eq!(buf.row_text(0), "abcd");
        assert_eq!(buf.row_text(1), "ef  ");
    }

    #[test]
    fn test_pen_newline() {
        let mut buf = FrameBuffer::new(5, 2);
        let mut pen = buf.pen();
        pen.add_str("ab\ncd");
        assert_eq!(buf.row_text(0), "ab   ");
        assert_eq!(buf.row_text(1), "cd   ");
    }

    #[test]
    fn test_region_is_confined() {
        let mut buf = FrameBuffer::new(3, 4);
        {
            let mut pen = buf.region(1, 2);
            pen.add_str("xxxxxxxxxxxx");
        }
        assert_eq!(buf.row_text(0), "   ");
        assert_eq!(buf.row_text(1), "xxx");
        assert_eq!(buf.row_text(2), "xxx");
        assert_eq!(buf.row_text(3), "   ");
    }

    #[test]
    fn test_region_clamped_to_buffer() {
        let mut buf = FrameBuffer::new(3, 2);
        let pen = buf.region(1, 10);
        assert_eq!(pen.rows(), 1);
    }

    #[test]
    fn test_clear_only_touches_band() {
        let mut buf = FrameBuffer::new(2, 3);
        buf.pen().add_str("aabbcc");
        buf.region(1, 1).clear();
        assert_eq!(buf.row_text(0), "aa");
        assert_eq!(buf.row_text(1), "  ");
        assert_eq!(buf.row_text(2), "cc");
    }

    #[test]
    fn test_attrs_and_colors_applied() {
        let mut buf = FrameBuffer::new(4, 1);
        {
            let mut pen = buf.pen();
            pen.attr_on(Attr::BOLD);
            pen.color_on(Rgba::GREEN, Rgba::BLACK);
            pen.add_char('a');
            pen.attr_off(Attr::BOLD);
            pen.color_off();
            pen.add_char('b');
        }
        let a = buf.get(0, 0).unwrap();
        assert_eq!(a.attrs, Attr::BOLD);
        assert_eq!(a.fg, Rgba::GREEN);
        let b = buf.get(1, 0).unwrap();
        assert_eq!(b.attrs, Attr::NONE);
        assert_eq!(b.fg, Rgba::TERMINAL_DEFAULT);
    }
}
