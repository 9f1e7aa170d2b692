//! frame/types.rs
//! Frame variants and the timestamped record.
//!
//! Notes:
//! - Channels are 0-based here; the object codec adds 1 on disk.
//! - `arbitration_id` holds the bare id; the extended marker is a separate bool.

use crate::constants::object_types;

/// Classic CAN data or remote frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanFrame {
    pub channel: u16,
    pub arbitration_id: u32,
    pub is_extended_id: bool,
    pub is_remote_frame: bool,
    pub is_rx: bool,
    /// Data length code as transmitted (0..=8, may exceed `data.len()` for remote frames).
    pub dlc: u8,
    pub data: Vec<u8>,
}

/// CAN-FD frame. EDL is implied by the variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanFdFrame {
    pub channel: u16,
    pub arbitration_id: u32,
    pub is_extended_id: bool,
    pub is_remote_frame: bool,
    pub is_rx: bool,
    pub bitrate_switch: bool,
    pub error_state_indicator: bool,
    pub data: Vec<u8>,
}

/// Diagnostic error-frame record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorFrame {
    pub channel: u16,
    pub arbitration_id: u32,
    pub is_extended_id: bool,
    pub dlc: u8,
    pub data: Vec<u8>,
}

/// Annotation placed on the trace timeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Marker {
    pub event_type: u32,
    pub foreground_color: u32,
    pub background_color: u32,
    pub relocatable: bool,
    pub group_name: String,
    pub marker_name: String,
    pub description: String,
}

/// One decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Can(CanFrame),
    CanFd(CanFdFrame),
    Error(ErrorFrame),
    Marker(Marker),
    /// An object type this codec does not interpret; payload kept verbatim.
    Unknown { object_type: u32, payload: Vec<u8> },
}

impl Frame {
    /// Object type written for this variant.
    pub fn object_type(&self) -> u32 {
        match self {
            Frame::Can(_) => object_types::CAN_MESSAGE,
            Frame::CanFd(_) => object_types::CAN_FD_MESSAGE,
            Frame::Error(_) => object_types::CAN_ERROR_EXT,
            Frame::Marker(_) => object_types::GLOBAL_MARKER,
            Frame::Unknown { object_type, .. } => *object_type,
        }
    }

    /// True for classic, FD and error frames.
    pub fn is_bus_event(&self) -> bool {
        matches!(self, Frame::Can(_) | Frame::CanFd(_) | Frame::Error(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Frame::Unknown { .. })
    }

    pub fn channel(&self) -> Option<u16> {
        match self {
            Frame::Can(f) => Some(f.channel),
            Frame::CanFd(f) => Some(f.channel),
            Frame::Error(f) => Some(f.channel),
            Frame::Marker(_) | Frame::Unknown { .. } => None,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Frame::Can(f) => &f.data,
            Frame::CanFd(f) => &f.data,
            Frame::Error(f) => &f.data,
            Frame::Marker(_) => &[],
            Frame::Unknown { payload, .. } => payload,
        }
    }
}

impl From<CanFrame> for Frame {
    fn from(f: CanFrame) -> Self {
        Frame::Can(f)
    }
}

impl From<CanFdFrame> for Frame {
    fn from(f: CanFdFrame) -> Self {
        Frame::CanFd(f)
    }
}

impl From<ErrorFrame> for Frame {
    fn from(f: ErrorFrame) -> Self {
        Frame::Error(f)
    }
}

impl From<Marker> for Frame {
    fn from(m: Marker) -> Self {
        Frame::Marker(m)
    }
}

/// A frame with its absolute timestamp in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: f64,
    pub frame: Frame,
}

impl Record {
    pub fn new(timestamp: f64, frame: impl Into<Frame>) -> Self {
        Self { timestamp, frame: frame.into() }
    }
}
