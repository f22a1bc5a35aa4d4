//! The mixer tree and the context object that owns it.
//!
//! A device exposes classes ("inputs", "outputs", ...), each holding controls
//! of one of three kinds. The tree itself is immutable for the life of the
//! session; only geometry (rebuilt on resize), the per-class scroll offset
//! and the selection change. Live values are never stored here: they are
//! fetched from the transport each time a control is drawn.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, RenderConfig};
use crate::renderer::FrameBuffer;
use crate::widgets::DrawStyle;

pub mod transport;

pub use transport::{MixerTransport, SnapshotTransport, TransportError};

/// Maximum value of a level channel.
pub const AUDIO_MAX_GAIN: u8 = 255;

// =============================================================================
// Device
// =============================================================================

/// Identity reported by an opened device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub config: String,
}

// =============================================================================
// Controls
// =============================================================================

/// One member of an enumeration control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub ord: i32,
    pub label: String,
}

/// One member of a set control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMember {
    pub mask: u32,
    pub label: String,
}

/// Type-specific description of a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlDescriptor {
    /// Exactly one member is active, identified by its ordinal.
    Enumeration { members: Vec<EnumMember> },
    /// Any combination of members, identified by a bitmask.
    Set { members: Vec<SetMember> },
    /// One gain value per channel.
    Level { channels: u8 },
}

impl ControlDescriptor {
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Enumeration { .. } => ControlKind::Enumeration,
            Self::Set { .. } => ControlKind::Set,
            Self::Level { channels } => ControlKind::Level {
                channels: *channels,
            },
        }
    }

    /// Rows the control occupies on its class surface: the label line, one
    /// line per channel (or one for the members) and a blank separator.
    pub fn widget_height(&self) -> u16 {
        match self {
            Self::Level { channels } => 2 + *channels as u16,
            Self::Enumeration { .. } | Self::Set { .. } => 3,
        }
    }
}

/// The shape of a control's value, as the transport needs to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Enumeration,
    Set,
    Level { channels: u8 },
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumeration => f.write_str("enumeration"),
            Self::Set => f.write_str("set"),
            Self::Level { channels } => write!(f, "{channels}-channel level"),
        }
    }
}

/// A live value read from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlValue {
    /// Ordinal of the active enumeration member.
    Ordinal(i32),
    /// Bitmask of the present set members.
    Mask(u32),
    /// One level per channel.
    Levels(Vec<u8>),
}

impl ControlValue {
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Ordinal(_) => ControlKind::Enumeration,
            Self::Mask(_) => ControlKind::Set,
            Self::Levels(levels) => ControlKind::Level {
                channels: levels.len().min(u8::MAX as usize) as u8,
            },
        }
    }
}

/// One mixer parameter and the region of its class surface it draws into.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    /// Index into the device's control table.
    pub index: usize,
    pub label: String,
    pub descriptor: ControlDescriptor,
    /// Navigable member of a set, or channel of an unlocked level.
    pub setindex: usize,
    pub(crate) widget_y: u16,
    pub(crate) height: u16,
}

impl Control {
    pub fn new(index: usize, label: impl Into<String>, descriptor: ControlDescriptor) -> Self {
        Self {
            index,
            label: label.into(),
            descriptor,
            setindex: 0,
            widget_y: 0,
            height: 0,
        }
    }

    /// First row of this control on its class surface.
    #[inline]
    pub fn widget_y(&self) -> u16 {
        self.widget_y
    }

    /// Rows this control occupies.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }
}

// =============================================================================
// Classes
// =============================================================================

/// A named group of controls sharing one scrollable surface.
#[derive(Debug, Clone)]
pub struct MixerClass {
    pub name: String,
    pub controls: Vec<Control>,
    /// First surface row shown in the viewport. Owned by the input loop.
    pub scroll_y: u16,
    pub(crate) surface: FrameBuffer,
    pub(crate) height: u16,
}

impl MixerClass {
    pub fn new(name: impl Into<String>, controls: Vec<Control>) -> Self {
        Self {
            name: name.into(),
            controls,
            scroll_y: 0,
            surface: FrameBuffer::default(),
            height: 0,
        }
    }

    /// The virtual surface the class's controls are drawn on.
    #[inline]
    pub fn surface(&self) -> &FrameBuffer {
        &self.surface
    }

    /// Rows used by the laid-out controls.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Control whose region contains surface row `row`.
    pub fn control_at_row(&self, row: u16) -> Option<usize> {
        self.controls
            .iter()
            .position(|c| row >= c.widget_y && row < c.widget_y + c.height)
    }

    /// Adjust `scroll_y` so control `idx` lies inside a viewport of
    /// `viewport_rows` rows, moving as little as possible.
    ///
    /// A control taller than the viewport is aligned to its first row.
    pub fn scroll_to_control(&mut self, idx: usize, viewport_rows: u16) -> u16 {
        let Some(control) = self.controls.get(idx) else {
            return self.scroll_y;
        };
        let top = control.widget_y;
        let bottom = top + control.height;

        if top < self.scroll_y || control.height >= viewport_rows {
            self.scroll_y = top;
        } else if bottom > self.scroll_y + viewport_rows {
            self.scroll_y = bottom - viewport_rows;
        }
        self.scroll_y
    }
}

// =============================================================================
// Selection
// =============================================================================

/// What the input loop currently has selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub class: usize,
    pub control: usize,
    /// Set member or level channel under the cursor.
    pub sub: usize,
    /// Level channels move independently.
    pub channels_unlocked: bool,
}

// =============================================================================
// Mixer
// =============================================================================

/// The panel's context: device tree, selection and every surface.
///
/// Passed by reference into each draw; nothing in the crate keeps state of
/// its own.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub device: DeviceIdentity,
    pub classes: Vec<MixerClass>,
    pub selection: Selection,
    pub(crate) header: FrameBuffer,
    pub(crate) classbar: FrameBuffer,
    pub(crate) screen: FrameBuffer,
    pub(crate) style: DrawStyle,
    pub(crate) layout: LayoutConfig,
    pub(crate) banner: String,
}

impl Mixer {
    /// Build the context. Surfaces are empty until
    /// [`Mixer::create_widgets`] runs.
    pub fn new(device: DeviceIdentity, classes: Vec<MixerClass>, config: &RenderConfig) -> Self {
        Self {
            device,
            classes,
            selection: Selection::default(),
            header: FrameBuffer::default(),
            classbar: FrameBuffer::default(),
            screen: FrameBuffer::default(),
            style: DrawStyle::new(config.caps),
            layout: config.layout,
            banner: config.banner.clone(),
        }
    }

    #[inline]
    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    #[inline]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn header(&self) -> &FrameBuffer {
        &self.header
    }

    pub fn classbar(&self) -> &FrameBuffer {
        &self.classbar
    }

    /// Base screen under the header, class bar and viewport.
    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    /// Writable base screen, for status or help lines below the viewport.
    pub fn screen_mut(&mut self) -> &mut FrameBuffer {
        &mut self.screen
    }

    pub fn active_class(&self) -> Option<&MixerClass> {
        self.classes.get(self.selection.class)
    }

    pub fn active_class_mut(&mut self) -> Option<&mut MixerClass> {
        self.classes.get_mut(self.selection.class)
    }

    /// Rows of the active class visible on the current screen.
    pub fn viewport_rows(&self) -> u16 {
        self.layout.viewport_rows(self.screen.height())
    }
}
