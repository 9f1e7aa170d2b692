// File header suite. Covers:

// * byte layout of the 144-byte header region
// * SYSTEMTIME conversion and the writer's timestamp anchor
// * rejection of foreign or truncated files

#[cfg(test)]
mod tests {
    use blf_core::headers::{decode_file_header, encode_file_header, header_anchor, FileHeader, HeaderError, SystemTime};

    // ## 1️⃣ Layout

    #[test]
    fn default_header_layout() {
        let bytes = encode_file_header(&FileHeader::default());
        assert_eq!(bytes.len(), 144);
        assert_eq!(&bytes[..4], b"LOGG");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 144);
        assert_eq!(bytes[8], 5); // application id
        assert_eq!(&bytes[12..16], &[2, 6, 8, 1]);
        assert!(bytes[72..].iter().all(|b| *b == 0));
    }

    #[test]
    fn header_round_trip() {
        let h = FileHeader {
            file_size: 123_456,
            uncompressed_size: 654_321,
            object_count: 7,
            start_time: SystemTime::from_timestamp(1_700_000_000.5),
            stop_time: SystemTime::from_timestamp(1_700_000_100.25),
            ..FileHeader::default()
        };
        let bytes = encode_file_header(&h);
        assert_eq!(decode_file_header(&bytes).unwrap(), h);
        assert_eq!(decode_file_header(&bytes[..72]).unwrap(), h);
    }

    // ## 2️⃣ Wall clock

    #[test]
    fn systemtime_fields_are_utc() {
        let t = SystemTime::from_timestamp(1_700_000_000.5);
        assert_eq!(
            t,
            SystemTime {
                year: 2023,
                month: 11,
                day_of_week: 2,
                day: 14,
                hour: 22,
                minute: 13,
                second: 20,
                milliseconds: 500,
            }
        );
        assert_eq!(t.to_timestamp(), 1_700_000_000.5);
    }

    #[test]
    fn implausible_timestamps_map_to_zero() {
        assert!(SystemTime::from_timestamp(12.0).is_zero());
        assert!(SystemTime::from_timestamp(f64::NAN).is_zero());
        assert_eq!(SystemTime::ZERO.to_timestamp(), 0.0);
    }

    #[test]
    fn anchor_is_millisecond_floor() {
        assert_eq!(header_anchor(1_700_000_000.5004), 1_700_000_000.5);
        assert_eq!(header_anchor(0.0), 0.0);
        assert_eq!(header_anchor(42.7), 0.0);
    }

    // ## 3️⃣ Rejection

    #[test]
    fn foreign_magic_is_rejected() {
        let mut bytes = encode_file_header(&FileHeader::default());
        bytes[..4].copy_from_slice(b"ABCD");
        assert!(matches!(decode_file_header(&bytes), Err(HeaderError::InvalidMagic { have, .. }) if &have == b"ABCD"));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let bytes = encode_file_header(&FileHeader::default());
        assert!(matches!(decode_file_header(&bytes[..40]), Err(HeaderError::BufferTooShort { .. })));
        assert!(matches!(decode_file_header(&bytes[..2]), Err(HeaderError::BufferTooShort { .. })));
    }

    #[test]
    fn undersized_header_size_is_rejected() {
        let mut bytes = encode_file_header(&FileHeader::default());
        bytes[4..8].copy_from_slice(&16u32.to_le_bytes());
        assert!(matches!(decode_file_header(&bytes), Err(HeaderError::InvalidHeaderSize { have: 16, .. })));
    }
}
