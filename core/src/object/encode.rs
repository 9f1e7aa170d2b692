//! object/encode.rs
//!
//! Serializes a frame into one padded object.
//!
//! Layout:
//!
//! ```text
//! [ base header (16)  ] "LOBJ", header_size=32, version=1, object_size, object_type
//! [ v1 header (16)    ] flags=TIME_ONE_NANS, client_index, object_version, ticks
//! [ payload (N)       ]
//! [ zero padding (0-3)] not counted in object_size
//! ```

use crate::constants::{time_units, CAN_MSG_EXT, OBJ_HEADER_BASE_LEN, OBJ_HEADER_V1_LEN};
use crate::frame::{len_to_dlc, CanFdFrame, CanFrame, ErrorFrame, Frame, Marker, CAN_FD_MAX_LEN, CAN_MAX_LEN};
use crate::object::types::{CanMsgFlags, FdFlags, ObjectError, ObjectHeaderBase, ObjectHeaderV1};
use crate::primitives::{pad_to_4, put_fixed, put_u16, put_u32, put_u64, put_u8, put_zeros};

/// Write the 16-byte base header.
pub fn write_base_header(out: &mut Vec<u8>, h: &ObjectHeaderBase) {
    out.extend_from_slice(&h.signature);
    put_u16(out, h.header_size);
    put_u16(out, h.header_version);
    put_u32(out, h.object_size);
    put_u32(out, h.object_type);
}

/// Nanosecond ticks between `stream_start` and `timestamp`, clamped at zero.
pub fn ticks_since(timestamp: f64, stream_start: f64) -> u64 {
    let ns = ((timestamp - stream_start) * 1e9).round();
    if ns > 0.0 {
        ns as u64
    } else {
        0
    }
}

/// Encode `frame` as a version-1 object with nanosecond ticks relative to
/// `stream_start`. The result is padded to a multiple of four bytes.
pub fn encode_object(frame: &Frame, timestamp: f64, stream_start: f64) -> Result<Vec<u8>, ObjectError> {
    let payload = encode_payload(frame)?;

    let header_size = OBJ_HEADER_BASE_LEN + OBJ_HEADER_V1_LEN;
    let object_size = header_size + payload.len();
    let object_size_u32 =
        u32::try_from(object_size).map_err(|_| ObjectError::ObjectTooLarge { have: object_size })?;
    let padding = pad_to_4(object_size);

    let mut out = Vec::with_capacity(object_size + padding);
    write_base_header(&mut out, &ObjectHeaderBase::new(header_size as u16, object_size_u32, frame.object_type()));

    let v1 = ObjectHeaderV1 {
        flags: time_units::TIME_ONE_NANS,
        client_index: 0,
        object_version: 0,
        timestamp: ticks_since(timestamp, stream_start),
    };
    put_u32(&mut out, v1.flags);
    put_u16(&mut out, v1.client_index);
    put_u16(&mut out, v1.object_version);
    put_u64(&mut out, v1.timestamp);

    out.extend_from_slice(&payload);
    put_zeros(&mut out, padding);

    debug_assert_eq!(out.len() % 4, 0, "object not padded");
    Ok(out)
}

fn encode_payload(frame: &Frame) -> Result<Vec<u8>, ObjectError> {
    match frame {
        Frame::Can(f) => encode_can(f),
        Frame::CanFd(f) => encode_can_fd(f),
        Frame::Error(f) => encode_error_ext(f),
        Frame::Marker(m) => Ok(encode_marker(m)),
        Frame::Unknown { payload, .. } => Ok(payload.clone()),
    }
}

#[inline]
fn wire_id(arbitration_id: u32, is_extended_id: bool) -> u32 {
    if is_extended_id {
        arbitration_id | CAN_MSG_EXT
    } else {
        arbitration_id
    }
}

fn msg_flags(is_remote_frame: bool, is_rx: bool) -> u8 {
    let mut flags = CanMsgFlags::empty();
    flags.set(CanMsgFlags::REMOTE, is_remote_frame);
    flags.set(CanMsgFlags::DIR, !is_rx);
    flags.bits()
}

fn check_len(have: usize, max: usize) -> Result<(), ObjectError> {
    if have > max {
        return Err(ObjectError::PayloadTooLong { have, max });
    }
    Ok(())
}

fn encode_can(f: &CanFrame) -> Result<Vec<u8>, ObjectError> {
    check_len(f.data.len(), CAN_MAX_LEN)?;
    let mut out = Vec::with_capacity(crate::constants::CAN_MSG_LEN);
    put_u16(&mut out, f.channel.saturating_add(1));
    put_u8(&mut out, msg_flags(f.is_remote_frame, f.is_rx));
    put_u8(&mut out, f.dlc);
    put_u32(&mut out, wire_id(f.arbitration_id, f.is_extended_id));
    put_fixed(&mut out, &f.data, CAN_MAX_LEN);
    Ok(out)
}

fn encode_can_fd(f: &CanFdFrame) -> Result<Vec<u8>, ObjectError> {
    check_len(f.data.len(), CAN_FD_MAX_LEN)?;
    let mut fd_flags = FdFlags::EDL;
    fd_flags.set(FdFlags::BRS, f.bitrate_switch);
    fd_flags.set(FdFlags::ESI, f.error_state_indicator);

    let mut out = Vec::with_capacity(crate::constants::CAN_FD_MSG_LEN);
    put_u16(&mut out, f.channel.saturating_add(1));
    put_u8(&mut out, msg_flags(f.is_remote_frame, f.is_rx));
    put_u8(&mut out, len_to_dlc(f.data.len()));
    put_u32(&mut out, wire_id(f.arbitration_id, f.is_extended_id));
    put_u32(&mut out, 0); // frame length
    put_u8(&mut out, 0); // bit count
    put_u8(&mut out, fd_flags.bits());
    put_u8(&mut out, f.data.len() as u8);
    put_zeros(&mut out, 5);
    put_fixed(&mut out, &f.data, CAN_FD_MAX_LEN);
    Ok(out)
}

fn encode_error_ext(f: &ErrorFrame) -> Result<Vec<u8>, ObjectError> {
    check_len(f.data.len(), CAN_MAX_LEN)?;
    let mut out = Vec::with_capacity(crate::constants::CAN_ERROR_EXT_LEN);
    put_u16(&mut out, f.channel.saturating_add(1));
    put_u16(&mut out, 0); // length
    put_u32(&mut out, 0); // flags
    put_u8(&mut out, 0); // ecc
    put_u8(&mut out, 0); // position
    put_u8(&mut out, f.dlc);
    put_zeros(&mut out, 1);
    put_u32(&mut out, 0); // frame length
    put_u32(&mut out, wire_id(f.arbitration_id, f.is_extended_id));
    put_u16(&mut out, 0); // ext flags
    put_zeros(&mut out, 2);
    put_fixed(&mut out, &f.data, CAN_MAX_LEN);
    Ok(out)
}

fn encode_marker(m: &Marker) -> Vec<u8> {
    let group = m.group_name.as_bytes();
    let name = m.marker_name.as_bytes();
    let description = m.description.as_bytes();

    let mut out = Vec::with_capacity(crate::constants::GLOBAL_MARKER_LEN + group.len() + name.len() + description.len());
    put_u32(&mut out, m.event_type);
    put_u32(&mut out, m.foreground_color);
    put_u32(&mut out, m.background_color);
    put_zeros(&mut out, 3);
    put_u8(&mut out, u8::from(m.relocatable));
    put_u32(&mut out, group.len() as u32);
    put_u32(&mut out, name.len() as u32);
    put_u32(&mut out, description.len() as u32);
    put_zeros(&mut out, 12);
    out.extend_from_slice(group);
    out.extend_from_slice(name);
    out.extend_from_slice(description);
    out
}
