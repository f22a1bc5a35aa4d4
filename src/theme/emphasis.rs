//! Strong emphasis with a standout fallback.
//!
//! Some legacy terminals have no bold attribute. The backend is picked once
//! from [`TermCaps`] and every widget goes through it.

use crate::config::TermCaps;
use crate::renderer::Pen;
use crate::types::Attr;

/// How emphasized text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    /// Reverse video.
    Standout,
}

impl Emphasis {
    pub fn probe(caps: &TermCaps) -> Self {
        if caps.bold { Self::Bold } else { Self::Standout }
    }

    /// The attribute this backend turns on.
    pub fn attr(self) -> Attr {
        match self {
            Self::Bold => Attr::BOLD,
            Self::Standout => Attr::INVERSE,
        }
    }

    pub fn emphasize(self, pen: &mut Pen<'_>) {
        pen.attr_on(self.attr());
    }

    /// Clear whichever of bold and standout is currently set on the pen.
    ///
    /// Goes by the pen's current bits, not by the backend.
    pub fn de_emphasize(self, pen: &mut Pen<'_>) {
        let current = pen.attrs();
        if current.contains(Attr::BOLD) {
            pen.attr_off(Attr::BOLD);
        }
        if current.contains(Attr::INVERSE) {
            pen.attr_off(Attr::INVERSE);
        }
    }
}
