//! # aiomixer-tui
//!
//! Rendering core of a terminal control panel for audio mixer devices.
//!
//! ## Architecture
//!
//! A device's controls are grouped into classes. Each class draws onto its
//! own virtual surface, taller than the screen, and the panel shows a
//! scrolled window of the active class between a header and a class bar:
//!
//! ```text
//! MixerTransport → Mixer (tree, selection) → draw_* onto surfaces → compose → DiffRenderer
//! ```
//!
//! Values are never cached. Every [`Mixer::draw_control`] reads the live
//! value from the transport, so a redraw always reflects the device.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Attr, Cell, ClipRect)
//! - [`config`] - Terminal capabilities and layout constants
//! - [`mixer`] - Device tree, selection and the transport seam
//! - [`renderer`] - Surfaces, pen, ANSI output and diff rendering
//! - [`theme`] - Color roles, palette and emphasis
//! - [`widgets`] - Geometry, control drawing, header, class bar, device list

pub mod config;
pub mod error;
pub mod mixer;
pub mod renderer;
pub mod theme;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use config::{LayoutConfig, RenderConfig, TermCaps};
pub use error::{Error, Result};

pub use mixer::{
    Control, ControlDescriptor, ControlKind, ControlValue, DeviceIdentity, EnumMember, Mixer,
    MixerClass, MixerTransport, Selection, SetMember, SnapshotTransport, TransportError,
    transport::device_path,
};

pub use renderer::{DiffRenderer, FrameBuffer, Pen};

pub use theme::{ColorPair, ColorRole, EnumColor, Emphasis, Palette, classify};

pub use widgets::{DrawStyle, bar_fill, bar_width, draw_mixer_select, render_control};
