//! The device transport seam.
//!
//! Opening devices and reading raw control values belongs to the platform
//! (on NetBSD, `open(2)` plus the `AUDIO_GETDEV` and `AUDIO_MIXER_READ`
//! ioctls). The panel only needs the three calls of [`MixerTransport`].
//!
//! [`SnapshotTransport`] is an in-memory implementation driven by a JSON
//! description of one or more devices. It backs the tests and the demo
//! binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    Control, ControlDescriptor, ControlKind, ControlValue, DeviceIdentity, MixerClass,
};

/// Path of the `n`th mixer device.
pub fn device_path(n: usize) -> String {
    format!("/dev/mixer{n}")
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("cannot query device identity")]
    Identity,

    #[error("failed to read control {index}")]
    Read { index: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Access to mixer devices.
///
/// Every call is blocking and expected to be quick; the panel is
/// single-threaded and simply waits.
pub trait MixerTransport {
    /// An open device. Dropping it closes the device.
    type Handle;

    fn open(&mut self, path: &str) -> Result<Self::Handle, TransportError>;

    fn query_identity(&mut self, handle: &Self::Handle) -> Result<DeviceIdentity, TransportError>;

    /// Read the current value of control `index`, whose shape is `kind`.
    fn read_control_value(
        &mut self,
        handle: &Self::Handle,
        index: usize,
        kind: ControlKind,
    ) -> Result<ControlValue, TransportError>;
}

// =============================================================================
// Snapshot transport
// =============================================================================

/// JSON description of a set of devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub devices: Vec<SnapshotDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDevice {
    /// Defaults to `/dev/mixerN` for the device's position.
    #[serde(default)]
    pub path: Option<String>,
    /// A device without identity opens but fails the identity query.
    #[serde(default)]
    pub identity: Option<DeviceIdentity>,
    #[serde(default)]
    pub classes: Vec<SnapshotClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotClass {
    pub name: String,
    #[serde(default)]
    pub controls: Vec<SnapshotControl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotControl {
    pub index: usize,
    pub label: String,
    pub kind: ControlDescriptor,
    /// A control without a value fails every read.
    #[serde(default)]
    pub value: Option<ControlValue>,
}

/// In-memory transport. The handle is the device's position in the snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTransport {
    snapshot: Snapshot,
    reads: usize,
}

impl SnapshotTransport {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot, reads: 0 }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of devices described.
    pub fn device_count(&self) -> usize {
        self.snapshot.devices.len()
    }

    /// Number of successful value reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Build the class tree of an opened device.
    pub fn classes(&self, handle: &usize) -> Vec<MixerClass> {
        let Some(device) = self.snapshot.devices.get(*handle) else {
            return Vec::new();
        };
        device
            .classes
            .iter()
            .map(|class| {
                let controls = class
                    .controls
                    .iter()
                    .map(|c| Control::new(c.index, c.label.clone(), c.kind.clone()))
                    .collect();
                MixerClass::new(class.name.clone(), controls)
            })
            .collect()
    }

    /// Change a control's value, as another process or the hardware would.
    pub fn set_value(&mut self, handle: &usize, index: usize, value: Option<ControlValue>) {
        if let Some(control) = self.control_mut(*handle, index) {
            control.value = value;
        }
    }

    fn control_mut(&mut self, handle: usize, index: usize) -> Option<&mut SnapshotControl> {
        self.snapshot
            .devices
            .get_mut(handle)?
            .classes
            .iter_mut()
            .flat_map(|class| class.controls.iter_mut())
            .find(|c| c.index == index)
    }
}

impl MixerTransport for SnapshotTransport {
    type Handle = usize;

    fn open(&mut self, path: &str) -> Result<usize, TransportError> {
        self.snapshot
            .devices
            .iter()
            .enumerate()
            .position(|(n, dev)| dev.path.clone().unwrap_or_else(|| device_path(n)) == path)
            .ok_or_else(|| TransportError::Open {
                path: path.to_string(),
                reason: "no such device".to_string(),
            })
    }

    fn query_identity(&mut self, handle: &usize) -> Result<DeviceIdentity, TransportError> {
        self.snapshot
            .devices
            .get(*handle)
            .and_then(|dev| dev.identity.clone())
            .ok_or(TransportError::Identity)
    }

    fn read_control_value(
        &mut self,
        handle: &usize,
        index: usize,
        _kind: ControlKind,
    ) -> Result<ControlValue, TransportError> {
        let value = self
            .control_mut(*handle, index)
            .and_then(|c| c.value.clone())
            .ok_or(TransportError::Read { index })?;
        self.reads += 1;
        Ok(value)
    }
}
