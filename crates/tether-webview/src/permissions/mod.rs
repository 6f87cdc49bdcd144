//! Content permission requests and their host-level counterparts.
//!
//! Pages ask for abstract capabilities (microphone, camera, protected media,
//! location). The OS gates them behind its own permission ids and can only
//! show one dialog at a time. [`PermissionReconciler`] translates between
//! the two vocabularies and serializes the prompts.

mod queue;
mod reconciler;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tether_common::BridgeError;

pub use queue::PendingPermissionQueue;
pub use reconciler::{Admission, PermissionReconciler, SlotPhase};

/// A capability requested by page content.
///
/// Serialized as its platform string; deserializing goes through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ContentCapability {
    AudioCapture,
    VideoCapture,
    ProtectedMediaId,
    MidiSysex,
}

impl ContentCapability {
    pub const ALL: [Self; 4] = [
        Self::AudioCapture,
        Self::VideoCapture,
        Self::ProtectedMediaId,
        Self::MidiSysex,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AudioCapture => "android.webkit.resource.AUDIO_CAPTURE",
            Self::VideoCapture => "android.webkit.resource.VIDEO_CAPTURE",
            Self::ProtectedMediaId => "android.webkit.resource.PROTECTED_MEDIA_ID",
            Self::MidiSysex => "android.webkit.resource.MIDI_SYSEX",
        }
    }
}

impl fmt::Display for ContentCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentCapability {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownCapability(s.to_string()))
    }
}

impl TryFrom<String> for ContentCapability {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ContentCapability> for &'static str {
    fn from(capability: ContentCapability) -> Self {
        capability.as_str()
    }
}

/// OS-level permission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum HostPermissionId {
    RecordAudio,
    Camera,
    AccessFineLocation,
}

impl HostPermissionId {
    pub const ALL: [Self; 3] = [Self::RecordAudio, Self::Camera, Self::AccessFineLocation];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecordAudio => "android.permission.RECORD_AUDIO",
            Self::Camera => "android.permission.CAMERA",
            Self::AccessFineLocation => "android.permission.ACCESS_FINE_LOCATION",
        }
    }

    /// Capture capability this permission unlocks. Location answers through
    /// its own origin-scoped callback instead.
    pub const fn capture_capability(self) -> Option<ContentCapability> {
        match self {
            Self::RecordAudio => Some(ContentCapability::AudioCapture),
            Self::Camera => Some(ContentCapability::VideoCapture),
            Self::AccessFineLocation => None,
        }
    }
}

impl fmt::Display for HostPermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostPermissionId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownPermission(s.to_string()))
    }
}

impl TryFrom<String> for HostPermissionId {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HostPermissionId> for &'static str {
    fn from(permission: HostPermissionId) -> Self {
        permission.as_str()
    }
}

/// Answers a capture-class request with the capabilities that were granted.
/// An empty list is a denial.
pub type CaptureResponder = Box<dyn FnOnce(Vec<ContentCapability>) + Send>;

/// Answers a geolocation prompt as `(origin, granted, retain)`.
pub type GeolocationCallback = Box<dyn FnOnce(&str, bool, bool) + Send>;
