//! FrameBuffer: the storage behind every surface.
//!
//! Class surfaces, the header, the class bar and the base screen are all
//! FrameBuffers. A class surface is usually taller than the terminal; the
//! compositor copies a scrolled window of it into the visible frame.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Fallible allocation**: surfaces are sized from terminal geometry, so
//!   creation and resize go through `try_reserve_exact` and report
//!   [`Error::SurfaceAlloc`] instead of aborting.
//! - **Wide characters**: the cell after a double-width glyph holds char 0.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::{Error, Result};
use crate::types::{Attr, Cell, ClipRect, Rgba};

use super::pen::Pen;

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    ///
    /// Only for small, fixed sizes. Anything sized from the terminal goes
    /// through [`FrameBuffer::try_new`].
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Allocate a buffer, reporting allocation failure as an error.
    pub fn try_new(width: u16, height: u16) -> Result<Self> {
        let cells = alloc_cells(width, height)?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Resize the buffer, discarding its content.
    pub fn try_resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.cells = alloc_cells(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Get buffer width.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get buffer height.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Clear `rows` rows starting at `top`.
    pub fn clear_rows(&mut self, top: u16, rows: u16) {
        let start = (top.min(self.height)) as usize * self.width as usize;
        let end = (top.saturating_add(rows).min(self.height)) as usize * self.width as usize;
        self.cells[start..end].fill(Cell::default());
    }

    /// Writer over the whole buffer.
    pub fn pen(&mut self) -> Pen<'_> {
        let rows = self.height;
        Pen::new(self, 0, rows)
    }

    /// Writer confined to `rows` rows starting at `top`.
    pub fn region(&mut self, top: u16, rows: u16) -> Pen<'_> {
        Pen::new(self, top, rows)
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        self.cells[idx] = Cell {
            char,
            fg,
            bg,
            attrs,
        };
        true
    }

    /// Draw text at a position, without wrapping.
    ///
    /// Returns the number of columns used.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if self.set_cell(col, y, ch as u32, fg, bg, attrs, clip) && w == 2 {
                let next = col + 1;
                if clip.map_or(true, |c| c.contains(next, y)) {
                    self.set_cell(next, y, 0, fg, bg, attrs, None);
                }
            }
            col = col.saturating_add(w as u16);
        }

        col.saturating_sub(x)
    }

    /// Draw text right-aligned within the row.
    ///
    /// Returns the column the text starts at.
    pub fn draw_text_right(&mut self, y: u16, text: &str, fg: Rgba, bg: Rgba, attrs: Attr) -> u16 {
        let text_width = string_width(text).min(u16::MAX as usize) as u16;
        let x = self.width.saturating_sub(text_width);
        self.draw_text(x, y, text, fg, bg, attrs, None);
        x
    }

    /// Copy `rows` rows of `src` starting at `src_y` into this buffer at `dst_y`.
    ///
    /// Columns are clipped to the narrower of the two buffers; rows past the
    /// end of either buffer are skipped.
    pub fn blit(&mut self, src: &FrameBuffer, src_y: u16, dst_y: u16, rows: u16) {
        let cols = self.width.min(src.width) as usize;
        if cols == 0 {
            return;
        }
        for row in 0..rows {
            let (Some(sy), Some(dy)) = (src_y.checked_add(row), dst_y.checked_add(row)) else {
                break;
            };
            if sy >= src.height || dy >= self.height {
                break;
            }
            let s = src.index(0, sy);
            let d = self.index(0, dy);
            self.cells[d..d + cols].copy_from_slice(&src.cells[s..s + cols]);
        }
    }

    /// Text content of a row, wide-character tails skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .filter(|c| c.char != 0)
            .filter_map(|c| char::from_u32(c.char))
            .collect()
    }
}

fn alloc_cells(width: u16, height: u16) -> Result<Vec<Cell>> {
    let size = width as usize * height as usize;
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(size)
        .map_err(|_| Error::SurfaceAlloc { width, height })?;
    cells.resize(size, Cell::default());
    Ok(cells)
}

// =============================================================================
// Text Width Utilities
// =============================================================================

/// Display width of a character (control characters are 0).
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Display width of a string.
pub fn string_width(s: &str) -> usize {
    s.split(char::is_control).map(UnicodeWidthStr::width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_creation() {
        let buffer = FrameBuffer::try_new(80, 24).unwrap();
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.row_text(0), " ".repeat(80));
    }

    #[test]
    fn test_try_resize_discards_content() {
        let mut buffer = FrameBuffer::new(10, 2);
        buffer.draw_text(0, 0, "abc", Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        buffer.try_resize(20, 3).unwrap();
        assert_eq!(buffer.width(), 20);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.row_text(0).trim_end(), "");
    }

    #[test]
    fn test_draw_text_right() {
        let mut buffer = FrameBuffer::new(10, 1);
        let x = buffer.draw_text_right(0, "mixer", Rgba::WHITE, Rgba::BLACK, Attr::NONE);
        assert_eq!(x, 5);
        assert_eq!(buffer.row_text(0), "     mixer");
    }

    #[test]
    fn test_draw_text_clipped() {
        let mut buffer = FrameBuffer::new(10, 1);
        let clip = ClipRect::new(0, 0, 3, 1);
        buffer.draw_text(0, 0, "abcdef", Rgba::WHITE, Rgba::BLACK, Attr::NONE, Some(&clip));
        assert_eq!(buffer.row_text(0).trim_end(), "abc");
    }

    #[test]
    fn test_blit_rows_and_clipping() {
        let mut src = FrameBuffer::new(4, 4);
        for y in 0..4 {
            src.draw_text(0, y, &format!("r{y}xx"), Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        }
        let mut dst = FrameBuffer::new(3, 3);
        dst.blit(&src, 2, 1, 5);
        assert_eq!(dst.row_text(0), "   ");
        assert_eq!(dst.row_text(1), "r2x");
        assert_eq!(dst.row_text(2), "r3x");
    }

    #[test]
    fn test_clear_rows() {
        let mut buffer = FrameBuffer::new(3, 3);
        for y in 0..3 {
            buffer.draw_text(0, y, "###", Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        }
        buffer.clear_rows(1, 10);
        assert_eq!(buffer.row_text(0), "###");
        assert_eq!(buffer.row_text(1), "   ");
        assert_eq!(buffer.row_text(2), "   ");
    }

    #[test]
    fn test_wide_char_continuation() {
        let mut buffer = FrameBuffer::new(4, 1);
        let used = buffer.draw_text(0, 0, "中a", Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        assert_eq!(used, 3);
        assert_eq!(buffer.get(1, 0).unwrap().char, 0);
        assert_eq!(buffer.row_text(0), "中a ");
    }

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width("中文"), 4);
        assert_eq!(char_width('\n'), 0);
    }
}
