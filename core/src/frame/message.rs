//! frame/message.rs
//! The generic bus message exchanged with drivers and other log formats.
//!
//! `Message` is the flat shape shared across every log backend; `Record` is
//! this codec's typed view. The two convert 1:1 for bus events.

use crate::frame::dlc::{dlc_to_len, len_to_dlc, CAN_MAX_LEN};
use crate::frame::types::{CanFdFrame, CanFrame, ErrorFrame, Frame, Record};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    /// Seconds; absolute when the source had a wall clock.
    pub timestamp: f64,
    pub arbitration_id: u32,
    pub is_extended_id: bool,
    pub is_remote_frame: bool,
    pub is_error_frame: bool,
    pub is_rx: bool,
    /// 0-based channel, `None` when the source does not know it.
    pub channel: Option<u16>,
    /// Payload length in bytes (already resolved through the DLC table for FD).
    pub dlc: u8,
    pub data: Vec<u8>,
    pub is_fd: bool,
    pub bitrate_switch: bool,
    pub error_state_indicator: bool,
}

impl Record {
    /// Flatten into a `Message`. Markers and unknown objects have no bus
    /// representation.
    pub fn to_message(&self) -> Option<Message> {
        let ts = self.timestamp;
        match &self.frame {
            Frame::Can(f) => Some(Message {
                timestamp: ts,
                arbitration_id: f.arbitration_id,
                is_extended_id: f.is_extended_id,
                is_remote_frame: f.is_remote_frame,
                is_rx: f.is_rx,
                channel: Some(f.channel),
                dlc: f.dlc,
                data: f.data.clone(),
                ..Message::default()
            }),
            Frame::CanFd(f) => Some(Message {
                timestamp: ts,
                arbitration_id: f.arbitration_id,
                is_extended_id: f.is_extended_id,
                is_remote_frame: f.is_remote_frame,
                is_rx: f.is_rx,
                channel: Some(f.channel),
                dlc: dlc_to_len(len_to_dlc(f.data.len())) as u8,
                data: f.data.clone(),
                is_fd: true,
                bitrate_switch: f.bitrate_switch,
                error_state_indicator: f.error_state_indicator,
                ..Message::default()
            }),
            Frame::Error(f) => Some(Message {
                timestamp: ts,
                arbitration_id: f.arbitration_id,
                is_extended_id: f.is_extended_id,
                is_error_frame: true,
                is_rx: true,
                channel: Some(f.channel),
                dlc: f.dlc,
                data: f.data.clone(),
                ..Message::default()
            }),
            Frame::Marker(_) | Frame::Unknown { .. } => None,
        }
    }

    /// Build a record from a `Message`. `default_channel` fills in a missing channel.
    pub fn from_message(msg: &Message, default_channel: u16) -> Self {
        let channel = msg.channel.unwrap_or(default_channel);
        let frame = if msg.is_error_frame {
            let dlc = len_to_dlc(usize::from(msg.dlc)).min(CAN_MAX_LEN as u8);
            Frame::Error(ErrorFrame {
                channel,
                arbitration_id: msg.arbitration_id,
                is_extended_id: msg.is_extended_id,
                dlc,
                data: msg.data.iter().copied().take(CAN_MAX_LEN).collect(),
            })
        } else if msg.is_fd {
            Frame::CanFd(CanFdFrame {
                channel,
                arbitration_id: msg.arbitration_id,
                is_extended_id: msg.is_extended_id,
                is_remote_frame: msg.is_remote_frame,
                is_rx: msg.is_rx,
                bitrate_switch: msg.bitrate_switch,
                error_state_indicator: msg.error_state_indicator,
                data: msg.data.clone(),
            })
        } else {
            Frame::Can(CanFrame {
                channel,
                arbitration_id: msg.arbitration_id,
                is_extended_id: msg.is_extended_id,
                is_remote_frame: msg.is_remote_frame,
                is_rx: msg.is_rx,
                dlc: msg.dlc,
                data: msg.data.clone(),
            })
        };
        Record { timestamp: msg.timestamp, frame }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::types::Marker;

    #[test]
    fn classic_message_maps_both_ways() {
        let msg = Message {
            timestamp: 1.5,
            arbitration_id: 0x123,
            is_rx: true,
            channel: Some(2),
            dlc: 3,
            data: vec![1, 2, 3],
            ..Message::default()
        };
        let rec = Record::from_message(&msg, 0);
        assert!(matches!(rec.frame, Frame::Can(ref f) if f.channel == 2 && f.dlc == 3));
        assert_eq!(rec.to_message().unwrap(), msg);
    }

    #[test]
    fn fd_message_dlc_is_resolved_length() {
        let msg = Message {
            arbitration_id: 0x1ABC_DEF,
            is_extended_id: true,
            is_fd: true,
            bitrate_switch: true,
            dlc: 13,
            data: vec![0xAA; 13],
            ..Message::default()
        };
        let rec = Record::from_message(&msg, 4);
        assert_eq!(rec.frame.channel(), Some(4));
        let back = rec.to_message().unwrap();
        assert_eq!(back.dlc, 16);
        assert_eq!(back.data.len(), 13);
        assert!(back.is_fd && back.bitrate_switch);
    }

    #[test]
    fn error_message_becomes_error_frame() {
        let msg = Message { is_error_frame: true, dlc: 2, data: vec![9, 9], ..Message::default() };
        let rec = Record::from_message(&msg, 0);
        assert!(matches!(rec.frame, Frame::Error(_)));
        assert!(rec.to_message().unwrap().is_error_frame);
    }

    #[test]
    fn markers_have_no_message() {
        let rec = Record::new(0.0, Marker::default());
        assert!(rec.to_message().is_none());
    }
}
