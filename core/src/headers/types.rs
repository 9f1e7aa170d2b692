//! headers/types.rs
//! File header struct and SYSTEMTIME wall-clock stamps.
//!
//! Notes:
//! - The header occupies a fixed 144-byte region; only the first 72 bytes
//!   carry fields, the rest are reserved zeros.
//! - Totals (`file_size`, `uncompressed_size`, `object_count`) are only
//!   trustworthy once the writer has closed the file.

use std::fmt;
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use crate::constants::{APPLICATION_ID, FILE_HEADER_SIZE, FILE_SIGNATURE, FORMAT_VERSION, MIN_WALL_CLOCK_TIMESTAMP};
use crate::primitives::{fmt_magic, Truncated};

/// Eight-field wall-clock stamp (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemTime {
    pub year: u16,
    pub month: u16,
    /// 0 = Sunday.
    pub day_of_week: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub milliseconds: u16,
}

impl SystemTime {
    pub const ZERO: SystemTime = SystemTime {
        year: 0,
        month: 0,
        day_of_week: 0,
        day: 0,
        hour: 0,
        minute: 0,
        second: 0,
        milliseconds: 0,
    };

    /// Convert a Unix timestamp, truncating to whole milliseconds.
    /// Values that cannot be a wall clock (before 1990) map to `ZERO`.
    pub fn from_timestamp(timestamp: f64) -> Self {
        if !timestamp.is_finite() || timestamp < MIN_WALL_CLOCK_TIMESTAMP {
            return Self::ZERO;
        }
        let millis = (timestamp * 1000.0).floor() as i64;
        let Some(t) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            return Self::ZERO;
        };
        Self {
            year: t.year() as u16,
            month: t.month() as u16,
            day_of_week: t.weekday().num_days_from_sunday() as u16,
            day: t.day() as u16,
            hour: t.hour() as u16,
            minute: t.minute() as u16,
            second: t.second() as u16,
            milliseconds: (t.timestamp_subsec_millis()) as u16,
        }
    }

    /// Convert back to a Unix timestamp; invalid or zero stamps yield 0.0.
    pub fn to_timestamp(&self) -> f64 {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
            .and_then(|d| {
                d.and_hms_milli_opt(
                    u32::from(self.hour),
                    u32::from(self.minute),
                    u32::from(self.second),
                    u32::from(self.milliseconds),
                )
            })
            .map(|dt| dt.and_utc().timestamp_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub(crate) fn fields(&self) -> [u16; 8] {
        [
            self.year,
            self.month,
            self.day_of_week,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.milliseconds,
        ]
    }

    pub(crate) fn from_fields(f: [u16; 8]) -> Self {
        Self {
            year: f[0],
            month: f[1],
            day_of_week: f[2],
            day: f[3],
            hour: f[4],
            minute: f[5],
            second: f[6],
            milliseconds: f[7],
        }
    }
}

/// Timestamp anchor a writer encodes relative to, given the first record's
/// timestamp: exactly what a reader will recover from `start_time`.
pub fn header_anchor(first_timestamp: f64) -> f64 {
    SystemTime::from_timestamp(first_timestamp).to_timestamp()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: [u8; 4],
    pub header_size: u32,
    pub application_id: u8,
    pub application_major: u8,
    pub application_minor: u8,
    pub application_build: u8,
    pub format_major: u8,
    pub format_minor: u8,
    pub format_build: u8,
    pub format_patch: u8,
    pub file_size: u64,
    pub uncompressed_size: u64,
    pub object_count: u32,
    pub objects_read: u32,
    pub start_time: SystemTime,
    pub stop_time: SystemTime,
}

impl Default for FileHeader {
    /// Header as this crate writes it, with zero totals.
    fn default() -> Self {
        Self {
            signature: FILE_SIGNATURE,
            header_size: FILE_HEADER_SIZE as u32,
            application_id: APPLICATION_ID,
            application_major: 0,
            application_minor: 0,
            application_build: 0,
            format_major: FORMAT_VERSION[0],
            format_minor: FORMAT_VERSION[1],
            format_build: FORMAT_VERSION[2],
            format_patch: FORMAT_VERSION[3],
            file_size: 0,
            uncompressed_size: FILE_HEADER_SIZE as u64,
            object_count: 0,
            objects_read: 0,
            start_time: SystemTime::ZERO,
            stop_time: SystemTime::ZERO,
        }
    }
}

impl FileHeader {
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.signature != FILE_SIGNATURE {
            return Err(HeaderError::InvalidMagic { have: self.signature, need: FILE_SIGNATURE });
        }
        if (self.header_size as usize) < crate::constants::FILE_HEADER_FIELDS_LEN {
            return Err(HeaderError::InvalidHeaderSize {
                have: self.header_size,
                min: crate::constants::FILE_HEADER_FIELDS_LEN as u32,
            });
        }
        Ok(())
    }

    pub fn start_timestamp(&self) -> f64 {
        self.start_time.to_timestamp()
    }

    pub fn stop_timestamp(&self) -> f64 {
        self.stop_time.to_timestamp()
    }
}

#[derive(Debug)]
pub enum HeaderError {
    /// Source ended before the header fields.
    BufferTooShort { have: usize, need: usize },

    /// First four bytes are not "LOGG".
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Declared header_size cannot hold the fields.
    InvalidHeaderSize { have: u32, min: u32 },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "file header too short: {} < {}", have, need),
            InvalidMagic { have, need } =>
                write!(f, "invalid file signature: expected {}, got {}", fmt_magic(need), fmt_magic(have)),
            InvalidHeaderSize { have, min } =>
                write!(f, "invalid header size: {} < {}", have, min),
        }
    }
}

impl std::error::Error for HeaderError {}

impl From<Truncated> for HeaderError {
    fn from(t: Truncated) -> Self {
        HeaderError::BufferTooShort { have: t.have, need: t.need }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_timestamps_are_not_wall_clock() {
        assert!(SystemTime::from_timestamp(0.0).is_zero());
        assert!(SystemTime::from_timestamp(12.5).is_zero());
        assert_eq!(SystemTime::ZERO.to_timestamp(), 0.0);
        assert_eq!(header_anchor(3.25), 0.0);
    }

    #[test]
    fn wall_clock_truncates_to_millis() {
        // 2023-11-14T22:13:20.123Z, a Tuesday
        let st = SystemTime::from_timestamp(1_700_000_000.123_9);
        assert_eq!((st.year, st.month, st.day), (2023, 11, 14));
        assert_eq!((st.hour, st.minute, st.second, st.milliseconds), (22, 13, 20, 123));
        assert_eq!(st.day_of_week, 2);
        assert!((st.to_timestamp() - 1_700_000_000.123).abs() < 1e-6);
        assert!(header_anchor(1_700_000_000.123_9) <= 1_700_000_000.123_9);
    }

    #[test]
    fn default_header_validates() {
        FileHeader::default().validate().unwrap();
        let bad = FileHeader { signature: *b"XXXX", ..FileHeader::default() };
        assert!(matches!(bad.validate(), Err(HeaderError::InvalidMagic { .. })));
    }
}
