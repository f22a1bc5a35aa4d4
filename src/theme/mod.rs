//! Semantic colors for mixer widgets.
//!
//! Widgets never pick colors directly. They ask for a [`ColorRole`] and the
//! [`Palette`] resolves it to a foreground/background pair, the same way
//! curses color pairs are numbered once and referenced everywhere.
//!
//! Enumeration members get their role from [`classify`], which recognises
//! the mixer vocabulary's canonical "on" and "off" names.

use crate::types::Rgba;

pub mod emphasis;

pub use emphasis::Emphasis;

/// Canonical name of the "on" enumeration member.
pub const AUDIO_N_ON: &str = "on";
/// Canonical name of the "off" enumeration member.
pub const AUDIO_N_OFF: &str = "off";

// =============================================================================
// Roles
// =============================================================================

/// Every color pair the panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Selection marker of a control or class.
    ControlSelected,
    /// Fill of a level bar.
    Levels,
    /// `*` of a set member that is present in the mask.
    SetSelected,
    /// Active enumeration member named "on".
    EnumOn,
    /// Active enumeration member named "off".
    EnumOff,
    /// Any other active enumeration member.
    EnumMisc,
}

/// Semantic class of an enumeration member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColor {
    On,
    Off,
    Misc,
}

impl EnumColor {
    pub fn role(self) -> ColorRole {
        match self {
            Self::On => ColorRole::EnumOn,
            Self::Off => ColorRole::EnumOff,
            Self::Misc => ColorRole::EnumMisc,
        }
    }
}

/// Classify an enumeration member name by exact match.
pub fn classify(name: &str) -> EnumColor {
    match name {
        AUDIO_N_ON => EnumColor::On,
        AUDIO_N_OFF => EnumColor::Off,
        _ => EnumColor::Misc,
    }
}

// =============================================================================
// Palette
// =============================================================================

/// A foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fg: Rgba,
    pub bg: Rgba,
}

impl ColorPair {
    pub const fn new(fg: Rgba, bg: Rgba) -> Self {
        Self { fg, bg }
    }
}

/// Resolution of every [`ColorRole`] to a [`ColorPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub control_selected: ColorPair,
    pub levels: ColorPair,
    pub set_selected: ColorPair,
    pub enum_on: ColorPair,
    pub enum_off: ColorPair,
    pub enum_misc: ColorPair,
}

impl Palette {
    pub fn pair(&self, role: ColorRole) -> ColorPair {
        match role {
            ColorRole::ControlSelected => self.control_selected,
            ColorRole::Levels => self.levels,
            ColorRole::SetSelected => self.set_selected,
            ColorRole::EnumOn => self.enum_on,
            ColorRole::EnumOff => self.enum_off,
            ColorRole::EnumMisc => self.enum_misc,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let none = Rgba::TERMINAL_DEFAULT;
        Self {
            control_selected: ColorPair::new(Rgba::MAGENTA, none),
            levels: ColorPair::new(Rgba::CYAN, none),
            set_selected: ColorPair::new(Rgba::BLACK, Rgba::CYAN),
            enum_on: ColorPair::new(Rgba::BLACK, Rgba::GREEN),
            enum_off: ColorPair::new(Rgba::BLACK, Rgba::RED),
            enum_misc: ColorPair::new(Rgba::BLACK, Rgba::YELLOW),
        }
    }
}
