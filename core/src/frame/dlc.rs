//! CAN-FD data length codes.

/// Payload length for each 4-bit DLC. Codes 0..=8 are literal byte counts.
pub const CAN_FD_DLC_LENGTHS: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Largest CAN-FD payload.
pub const CAN_FD_MAX_LEN: usize = 64;
/// Largest classic CAN payload.
pub const CAN_MAX_LEN: usize = 8;

/// Resolve a DLC to its payload length. Codes above 15 saturate.
#[inline]
pub fn dlc_to_len(dlc: u8) -> usize {
    CAN_FD_DLC_LENGTHS[usize::from(dlc.min(15))] as usize
}

/// Smallest DLC whose payload holds `len` bytes, saturating at 15.
pub fn len_to_dlc(len: usize) -> u8 {
    CAN_FD_DLC_LENGTHS
        .iter()
        .position(|&l| usize::from(l) >= len)
        .unwrap_or(15) as u8
}
