//! Error types.
//!
//! Everything here is fatal for an interactive session: the binary reports
//! the error on stderr and exits. The library itself never terminates the
//! process.

use crate::mixer::ControlKind;
use crate::mixer::transport::TransportError;

/// Result alias carrying the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A drawing surface could not be allocated.
    #[error("failed to create surface of {width}x{height} cells")]
    SurfaceAlloc { width: u16, height: u16 },

    /// The device transport failed.
    #[error("mixer device: {0}")]
    Transport(#[from] TransportError),

    /// The device answered with a value of the wrong shape for the control.
    #[error("control {index}: expected a {expected} value, device returned {got}")]
    ValueMismatch {
        index: usize,
        expected: ControlKind,
        got: ControlKind,
    },

    #[error("no class {0}")]
    UnknownClass(usize),

    #[error("no control {control} in class {class}")]
    UnknownControl { class: usize, control: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
