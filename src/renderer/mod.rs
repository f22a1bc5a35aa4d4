//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. Surfaces are [`FrameBuffer`]s written
//! through a [`Pen`]; the composed frame is committed by the [`DiffRenderer`]
//! as optimized ANSI escape sequences.
//!
//! ```text
//!   class surfaces, header, class bar, base screen   (FrameBuffer)
//!                         │  compose
//!                         ▼
//!                   visible frame                     (FrameBuffer)
//!                         │  DiffRenderer::render
//!                         ▼
//!                      Terminal
//! ```

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod output;
pub mod pen;

pub use buffer::{FrameBuffer, char_width, string_width};
pub use diff::DiffRenderer;
pub use output::{OutputBuffer, StatefulCellRenderer};
pub use pen::Pen;
