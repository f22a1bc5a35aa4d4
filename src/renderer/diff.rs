//! Differential renderer: the atomic commit of a composed frame.
//!
//! The DiffRenderer compares the new frame to the previous one and only
//! outputs cells that changed. The whole update is wrapped in a
//! synchronized-output block and written in one call, so the terminal never
//! shows a half-drawn frame.
//!
//! # Algorithm
//!
//! 1. Begin synchronized output
//! 2. For each cell of the new frame, skip it if the previous frame has the
//!    same size and an identical cell there, otherwise render it
//! 3. End synchronized output and flush (single write)
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Differential renderer for the fullscreen panel.
pub struct DiffRenderer {
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            cell_renderer: StatefulCellRenderer::new(),
            previous: None,
        }
    }

    /// Commit a frame to `out`, emitting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render<W: Write>(&mut self, buffer: &FrameBuffer, out: &mut W) -> io::Result<bool> {
        let mut has_changes = false;

        ansi::begin_sync(&mut self.output)?;
        self.cell_renderer.reset();

        let width = buffer.width();
        let height = buffer.height();
        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        if comparable.is_none() {
            ansi::reset(&mut self.output)?;
            ansi::clear_screen(&mut self.output)?;
        }

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                let changed = comparable
                    .and_then(|prev| prev.get(x, y))
                    .is_none_or(|prev_cell| prev_cell != cell);

                if changed {
                    has_changes = true;
                    self.cell_renderer.render_cell(&mut self.output, x, y, cell);
                }
            }
        }

        ansi::reset(&mut self.output)?;
        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(out)?;

        self.previous = Some(buffer.clone());

        Ok(has_changes)
    }

    /// Invalidate the previous frame; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Switch to the alternate screen with the cursor hidden.
    pub fn enter_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        ansi::enter_alt_screen(&mut self.output)?;
        ansi::cursor_hide(&mut self.output)?;
        ansi::clear_screen(&mut self.output)?;
        self.output.flush_to(out)?;
        self.invalidate();
        Ok(())
    }

    /// Leave the alternate screen and restore the cursor.
    pub fn exit_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        ansi::reset(&mut self.output)?;
        ansi::cursor_show(&mut self.output)?;
        ansi::exit_alt_screen(&mut self.output)?;
        self.output.flush_to(out)
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}
