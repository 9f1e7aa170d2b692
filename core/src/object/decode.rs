//! object/decode.rs
//!
//! Decodes one object from the front of an inflated container stream.
//!
//! Design notes:
//! - A wrong signature is fatal: every later offset would be garbage.
//! - Anything else that is merely not understood consumes its bytes and is
//!   reported as `Skipped` or `Frame::Unknown`, keeping the stream aligned.
//! - Payloads are read from `header_size`, not from a fixed offset, so longer
//!   headers from newer writers still decode.

use num_enum::TryFromPrimitive;

use crate::constants::{CAN_ID_MASK, CAN_MSG_EXT, OBJECT_SIGNATURE};
use crate::frame::{dlc_to_len, CanFdFrame, CanFrame, ErrorFrame, Frame, Marker, Record, CAN_FD_MAX_LEN, CAN_MAX_LEN};
use crate::object::types::{
    CanMsgFlags, Decoded, Fd64Flags, FdFlags, ObjectError, ObjectHeader, ObjectHeaderBase, ObjectHeaderV1,
    ObjectHeaderV2, ObjectType, ShortPayload,
};
use crate::primitives::{pad_to_4, ByteCursor, Truncated};

/// Read the 16-byte base header. Does not validate the signature.
pub fn read_base_header(c: &mut ByteCursor<'_>) -> Result<ObjectHeaderBase, Truncated> {
    Ok(ObjectHeaderBase {
        signature: c.array::<4>()?,
        header_size: c.u16()?,
        header_version: c.u16()?,
        object_size: c.u32()?,
        object_type: c.u32()?,
    })
}

/// Decode the object at the start of `buf`.
///
/// `stream_start` is added to the header's relative timestamp.
pub fn decode_object(buf: &[u8], stream_start: f64) -> Result<Decoded, ObjectError> {
    if let Some(sig) = buf.get(..4) {
        if sig != OBJECT_SIGNATURE {
            let mut have = [0u8; 4];
            have.copy_from_slice(sig);
            return Err(ObjectError::InvalidSignature { have });
        }
    }

    let mut c = ByteCursor::new(buf);
    let base = match read_base_header(&mut c) {
        Ok(base) => base,
        Err(_) => return Ok(Decoded::Incomplete),
    };

    let object_size = base.object_size as usize;
    if object_size < ObjectHeaderBase::LEN || object_size < usize::from(base.header_size) {
        return Err(ObjectError::InvalidObjectSize {
            object_size: base.object_size,
            header_size: base.header_size,
        });
    }
    if object_size > buf.len() {
        return Ok(Decoded::Incomplete);
    }

    let consumed = object_size + pad_to_4(object_size);
    let object = &buf[..object_size];

    let Some(header) = read_versioned_header(&base, object) else {
        log::warn!(
            "skipping object type {} with unsupported header (version {}, size {})",
            base.object_type, base.header_version, base.header_size
        );
        return Ok(Decoded::Skipped { object_type: base.object_type, consumed });
    };

    let timestamp = header.relative_seconds() + stream_start;
    let payload = &object[usize::from(base.header_size)..];

    let frame = match ObjectType::try_from_primitive(base.object_type) {
        Ok(ObjectType::CanMessage) | Ok(ObjectType::CanMessage2) => decode_can(payload),
        Ok(ObjectType::CanFdMessage) => decode_can_fd(payload),
        Ok(ObjectType::CanFdMessage64) => decode_can_fd_64(payload),
        Ok(ObjectType::CanErrorExt) => decode_error_ext(payload),
        Ok(ObjectType::GlobalMarker) => decode_marker(payload),
        _ => Ok(Frame::Unknown { object_type: base.object_type, payload: payload.to_vec() }),
    };

    match frame {
        Ok(frame) => Ok(Decoded::Record { record: Record { timestamp, frame }, consumed }),
        Err(ShortPayload(t)) => {
            log::warn!("skipping object type {}: {}", base.object_type, t);
            Ok(Decoded::Skipped { object_type: base.object_type, consumed })
        }
    }
}

/// Parse the version-specific header, or `None` if the version is unknown or
/// `header_size` is too small for it.
fn read_versioned_header(base: &ObjectHeaderBase, object: &[u8]) -> Option<ObjectHeader> {
    let header_size = usize::from(base.header_size);
    let mut c = ByteCursor::new(object.get(ObjectHeaderBase::LEN..header_size)?);
    match base.header_version {
        1 if header_size >= ObjectHeaderBase::LEN + ObjectHeaderV1::LEN => {
            Some(ObjectHeader::V1(ObjectHeaderV1 {
                flags: c.u32().ok()?,
                client_index: c.u16().ok()?,
                object_version: c.u16().ok()?,
                timestamp: c.u64().ok()?,
            }))
        }
        2 if header_size >= ObjectHeaderBase::LEN + ObjectHeaderV2::LEN => {
            let flags = c.u32().ok()?;
            let timestamp_status = c.u8().ok()?;
            c.skip(1).ok()?;
            Some(ObjectHeader::V2(ObjectHeaderV2 {
                flags,
                timestamp_status,
                object_version: c.u16().ok()?,
                timestamp: c.u64().ok()?,
                original_timestamp: c.u64().ok()?,
            }))
        }
        _ => None,
    }
}

#[inline]
fn split_id(raw: u32) -> (u32, bool) {
    (raw & CAN_ID_MASK, raw & CAN_MSG_EXT != 0)
}

fn decode_can(payload: &[u8]) -> Result<Frame, ShortPayload> {
    let mut c = ByteCursor::new(payload);
    let channel = c.u16()?;
    let flags = CanMsgFlags::from_bits_truncate(c.u8()?);
    let dlc = c.u8()?;
    let (arbitration_id, is_extended_id) = split_id(c.u32()?);
    let data = c.bytes(CAN_MAX_LEN)?;
    let is_remote_frame = flags.contains(CanMsgFlags::REMOTE);

    // Remote frames request `dlc` bytes but carry none.
    let len = if is_remote_frame { 0 } else { usize::from(dlc).min(CAN_MAX_LEN) };
    Ok(Frame::Can(CanFrame {
        channel: channel.saturating_sub(1),
        arbitration_id,
        is_extended_id,
        is_remote_frame,
        is_rx: !flags.contains(CanMsgFlags::DIR),
        dlc,
        data: data[..len].to_vec(),
    }))
}

fn decode_can_fd(payload: &[u8]) -> Result<Frame, ShortPayload> {
    let mut c = ByteCursor::new(payload);
    let channel = c.u16()?;
    let flags = CanMsgFlags::from_bits_truncate(c.u8()?);
    let dlc = c.u8()?;
    let (arbitration_id, is_extended_id) = split_id(c.u32()?);
    let _frame_length = c.u32()?;
    let _bit_count = c.u8()?;
    let fd_flags = FdFlags::from_bits_truncate(c.u8()?);
    let valid_bytes = usize::from(c.u8()?);
    c.skip(5)?;
    let data = c.bytes(CAN_FD_MAX_LEN)?;

    // valid_bytes is authoritative when consistent with the DLC; some
    // writers leave it zero.
    let table_len = dlc_to_len(dlc);
    let len = if valid_bytes > 0 && valid_bytes <= table_len { valid_bytes } else { table_len };

    Ok(Frame::CanFd(CanFdFrame {
        channel: channel.saturating_sub(1),
        arbitration_id,
        is_extended_id,
        is_remote_frame: flags.contains(CanMsgFlags::REMOTE),
        is_rx: !flags.contains(CanMsgFlags::DIR),
        bitrate_switch: fd_flags.contains(FdFlags::BRS),
        error_state_indicator: fd_flags.contains(FdFlags::ESI),
        data: data[..len].to_vec(),
    }))
}

fn decode_can_fd_64(payload: &[u8]) -> Result<Frame, ShortPayload> {
    let mut c = ByteCursor::new(payload);
    let channel = u16::from(c.u8()?);
    let dlc = c.u8()?;
    let valid_bytes = usize::from(c.u8()?);
    let _tx_count = c.u8()?;
    let (arbitration_id, is_extended_id) = split_id(c.u32()?);
    let _frame_length = c.u32()?;
    let flags = Fd64Flags::from_bits_truncate(c.u32()?);
    c.skip(16)?; // bit timing configs, BRS and CRC field offsets
    let _bit_count = c.u16()?;
    let direction = c.u8()?;
    let _ext_data_offset = c.u8()?;
    let _crc = c.u32()?;
    let data = c.bytes(valid_bytes.min(CAN_FD_MAX_LEN))?.to_vec();

    let channel = channel.saturating_sub(1);
    let is_remote_frame = flags.contains(Fd64Flags::REMOTE);
    let is_rx = direction == 0;

    if flags.contains(Fd64Flags::EDL) {
        Ok(Frame::CanFd(CanFdFrame {
            channel,
            arbitration_id,
            is_extended_id,
            is_remote_frame,
            is_rx,
            bitrate_switch: flags.contains(Fd64Flags::BRS),
            error_state_indicator: flags.contains(Fd64Flags::ESI),
            data,
        }))
    } else {
        let mut data = data;
        data.truncate(CAN_MAX_LEN);
        Ok(Frame::Can(CanFrame {
            channel,
            arbitration_id,
            is_extended_id,
            is_remote_frame,
            is_rx,
            dlc,
            data,
        }))
    }
}

fn decode_error_ext(payload: &[u8]) -> Result<Frame, ShortPayload> {
    let mut c = ByteCursor::new(payload);
    let channel = c.u16()?;
    let _length = c.u16()?;
    let _flags = c.u32()?;
    let _ecc = c.u8()?;
    let _position = c.u8()?;
    let dlc = c.u8()?;
    c.skip(1)?;
    let _frame_length = c.u32()?;
    let (arbitration_id, is_extended_id) = split_id(c.u32()?);
    let _ext_flags = c.u16()?;
    c.skip(2)?;
    let data = c.bytes(CAN_MAX_LEN)?;

    Ok(Frame::Error(ErrorFrame {
        channel: channel.saturating_sub(1),
        arbitration_id,
        is_extended_id,
        dlc,
        data: data[..usize::from(dlc).min(CAN_MAX_LEN)].to_vec(),
    }))
}

fn decode_marker(payload: &[u8]) -> Result<Frame, ShortPayload> {
    let mut c = ByteCursor::new(payload);
    let event_type = c.u32()?;
    let foreground_color = c.u32()?;
    let background_color = c.u32()?;
    c.skip(3)?;
    let relocatable = c.u8()? != 0;
    let group_len = c.u32()? as usize;
    let marker_len = c.u32()? as usize;
    let description_len = c.u32()? as usize;
    c.skip(12)?;

    let mut text = |len: usize| -> Result<String, Truncated> {
        let raw = c.bytes(len)?;
        Ok(String::from_utf8_lossy(raw).trim_end_matches('\0').to_owned())
    };
    let group_name = text(group_len)?;
    let marker_name = text(marker_len)?;
    let description = text(description_len)?;

    Ok(Frame::Marker(Marker {
        event_type,
        foreground_color,
        background_color,
        relocatable,
        group_name,
        marker_name,
        description,
    }))
}
