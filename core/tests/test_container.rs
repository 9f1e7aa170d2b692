// Container suite. Covers:

// * compress -> frame -> inflate identity (property based)
// * decoder tolerance: raw DEFLATE, stored containers, truncated streams
// * rejection of unknown methods and size disagreements
// * object tail carry across container boundaries

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;
    use proptest::prelude::*;

    use blf_core::container::{
        compress_container, decompress_container, encode_container_object, inflate_partial, CompressedContainer,
        ContainerError, ObjectStream,
    };
    use blf_core::frame::{CanFrame, Frame, Marker};
    use blf_core::object::encode_object;

    /// Container header + data as the reader hands it to the decoder.
    fn container_body(method: u16, declared: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&[0u8; 6]);
        out.extend_from_slice(&declared.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(data);
        out
    }

    fn framed_body(c: &CompressedContainer) -> Vec<u8> {
        let obj = encode_container_object(c).unwrap();
        let object_size = u32::from_le_bytes(obj[8..12].try_into().unwrap()) as usize;
        obj[16..object_size].to_vec()
    }

    fn can(id: u32) -> Frame {
        Frame::Can(CanFrame { arbitration_id: id, dlc: 2, data: vec![id as u8, 0xEE], ..CanFrame::default() })
    }

    // ## 1️⃣ Round trips

    proptest! {
        #[test]
        fn prop_compress_then_inflate_is_identity(payload in proptest::collection::vec(any::<u8>(), 0..4096), level in 0u32..=9) {
            let c = compress_container(&payload, level).unwrap();
            prop_assert_eq!(c.uncompressed_size as usize, payload.len());
            let body = framed_body(&c);
            prop_assert_eq!(decompress_container(&body).unwrap(), payload);
        }
    }

    #[test]
    fn raw_deflate_is_accepted() {
        let payload = b"raw deflate without a zlib wrapper".repeat(10);
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&payload).unwrap();
        let data = enc.finish().unwrap();

        let body = container_body(2, payload.len() as u32, &data);
        assert_eq!(decompress_container(&body).unwrap(), payload);
    }

    // ## 2️⃣ Rejection

    #[test]
    fn unknown_method_is_rejected() {
        let body = container_body(7, 3, b"abc");
        assert!(matches!(decompress_container(&body), Err(ContainerError::UnknownCompression { raw: 7 })));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let body = container_body(0, 10, b"12345");
        assert!(matches!(
            decompress_container(&body),
            Err(ContainerError::SizeMismatch { declared: 10, actual: 5 })
        ));

        let c = compress_container(&[1u8; 100], 9).unwrap();
        let mut body = framed_body(&c);
        body[8..12].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(decompress_container(&body), Err(ContainerError::SizeMismatch { declared: 99, .. })));
    }

    #[test]
    fn short_container_header_is_rejected() {
        assert!(matches!(decompress_container(&[2, 0, 0]), Err(ContainerError::BufferTooShort { .. })));
    }

    // ## 3️⃣ Truncation

    #[test]
    fn partial_inflate_returns_a_prefix() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::none());
        enc.write_all(&payload).unwrap();
        let data = enc.finish().unwrap();

        let body = container_body(2, payload.len() as u32, &data[..data.len() / 2]);
        let out = inflate_partial(&body).unwrap();
        assert!(!out.is_empty());
        assert!(out.len() < payload.len());
        assert_eq!(&payload[..out.len()], &out[..]);
    }

    #[test]
    fn partial_stored_container_is_cut_to_available_bytes() {
        let body = container_body(0, 100, &[5u8; 40]);
        assert_eq!(inflate_partial(&body).unwrap(), vec![5u8; 40]);
    }

    // ## 4️⃣ Tail carry

    fn odd_marker() -> Frame {
        Frame::Marker(Marker { group_name: "ab".into(), marker_name: "name".into(), description: "desc!".into(), ..Marker::default() })
    }

    #[test]
    fn boundary_inside_padding() {
        let mut stream_bytes = encode_object(&odd_marker(), 1.0, 0.0).unwrap(); // 83 + 1 pad
        stream_bytes.extend(encode_object(&can(0x10), 2.0, 0.0).unwrap());

        let mut stream = ObjectStream::new();
        let first = stream.feed(&stream_bytes[..83], 0.0);
        assert_eq!(first.records.len(), 1);
        assert_eq!(stream.pending(), 0);

        let second = stream.feed(&stream_bytes[83..], 0.0);
        assert!(second.error.is_none());
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0].frame, can(0x10));
        assert_eq!(stream.finish(), 0);
    }

    #[test]
    fn boundary_inside_object() {
        let mut stream_bytes = encode_object(&can(1), 1.0, 0.0).unwrap();
        stream_bytes.extend(encode_object(&can(2), 2.0, 0.0).unwrap());

        let mut stream = ObjectStream::new();
        let first = stream.feed(&stream_bytes[..70], 0.0);
        assert_eq!(first.records.len(), 1);
        assert_eq!(stream.pending(), 22);

        let second = stream.feed(&stream_bytes[70..], 0.0);
        assert_eq!(second.records.len(), 1);
        assert!((second.records[0].timestamp - 2.0).abs() < 1e-9);
    }

    #[test]
    fn every_split_point_yields_the_same_records() {
        let frames = [odd_marker(), can(1), odd_marker(), can(2)];
        let mut stream_bytes = Vec::new();
        for (i, f) in frames.iter().enumerate() {
            stream_bytes.extend(encode_object(f, i as f64, 0.0).unwrap());
        }

        for split in 0..=stream_bytes.len() {
            let mut stream = ObjectStream::new();
            let mut got = stream.feed(&stream_bytes[..split], 0.0).records;
            got.extend(stream.feed(&stream_bytes[split..], 0.0).records);
            let got: Vec<Frame> = got.into_iter().map(|r| r.frame).collect();
            assert_eq!(got, frames, "split at {}", split);
            assert_eq!(stream.finish(), 0);
        }
    }

    #[test]
    fn corrupt_object_stops_the_stream() {
        let mut stream_bytes = encode_object(&can(1), 1.0, 0.0).unwrap();
        stream_bytes.extend_from_slice(b"JUNKJUNKJUNKJUNK");
        stream_bytes.extend(encode_object(&can(2), 2.0, 0.0).unwrap());

        let out = ObjectStream::new().feed(&stream_bytes, 0.0);
        assert_eq!(out.records.len(), 1);
        assert!(out.error.is_some());
    }

    #[test]
    fn dangling_tail_is_reported_on_finish() {
        let bytes = encode_object(&can(1), 1.0, 0.0).unwrap();
        let mut stream = ObjectStream::new();
        assert!(stream.feed(&bytes[..30], 0.0).records.is_empty());
        assert_eq!(stream.finish(), 30);
    }

    // ## 5️⃣ Resync after a lost container

    #[test]
    fn reset_skips_to_the_next_object() {
        let first = encode_object(&can(1), 1.0, 0.0).unwrap();
        let mut stream = ObjectStream::new();
        assert!(stream.feed(&first[..20], 0.0).records.is_empty());
        assert_eq!(stream.reset(), 20);

        // The next payload starts inside the object whose head was lost.
        let mut payload = first[20..].to_vec();
        payload.extend(encode_object(&can(2), 2.0, 0.0).unwrap());
        payload.extend(encode_object(&can(3), 3.0, 0.0).unwrap());

        let out = stream.feed(&payload, 0.0);
        let frames: Vec<Frame> = out.records.into_iter().map(|r| r.frame).collect();
        assert_eq!(frames, vec![can(2), can(3)]);
        assert_eq!(out.dropped, first.len() - 20);
        assert!(out.error.is_none());
        assert_eq!(stream.finish(), 0);
    }

    #[test]
    fn resync_finds_a_signature_split_across_payloads() {
        let object = encode_object(&can(2), 2.0, 0.0).unwrap();
        let mut stream = ObjectStream::new();
        stream.reset();

        let mut head = b"xy".to_vec();
        head.extend_from_slice(&object[..2]);
        let out = stream.feed(&head, 0.0);
        assert!(out.records.is_empty());
        assert_eq!(out.dropped, 1);

        let out = stream.feed(&object[2..], 0.0);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].frame, can(2));
    }

    #[test]
    fn resync_ignores_implausible_signatures() {
        let mut payload = b"LOBJ".to_vec();
        payload.extend_from_slice(&[0u8; 12]);
        payload.extend(encode_object(&can(4), 4.0, 0.0).unwrap());

        let mut stream = ObjectStream::new();
        stream.reset();
        let out = stream.feed(&payload, 0.0);
        assert_eq!(out.dropped, 16);
        assert_eq!(out.records.len(), 1);
        assert!(out.error.is_none());
    }
}
