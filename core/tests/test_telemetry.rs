#[cfg(test)]
mod telemetry_snapshot_tests {
    use blf_core::telemetry::{ReaderCounters, TelemetrySnapshot, WriterCounters};

    fn make_writer_counters() -> WriterCounters {
        let mut c = WriterCounters::default();
        for _ in 0..10 {
            c.add_object(48, false);
        }
        c.add_object(100, true);
        c.add_container(120);
        c
    }

    #[test]
    fn writer_counters_accumulate() {
        let c = make_writer_counters();
        assert_eq!(c.objects_written, 11);
        assert_eq!(c.markers_written, 1);
        assert_eq!(c.bytes_uncompressed, 580);
        assert_eq!(c.containers_written, 1);
        assert_eq!(c.bytes_compressed, 120);
    }

    #[test]
    fn counters_merge_with_add_assign() {
        let mut a = make_writer_counters();
        a += make_writer_counters();
        assert_eq!(a.objects_written, 22);
        assert_eq!(a.bytes_compressed, 240);

        let mut r = ReaderCounters::default();
        r.add_container(100, 400);
        r.add_discarded(50);
        let mut total = ReaderCounters::default();
        total += r.clone();
        total.merge(&r);
        assert_eq!(total.containers_read, 2);
        assert_eq!(total.containers_discarded, 2);
        assert_eq!(total.bytes_compressed, 300);
        assert_eq!(total.bytes_inflated, 800);
    }

    #[test]
    fn compression_ratio_is_capped_at_one() {
        let mut c = WriterCounters::default();
        c.add_object(10, false);
        c.add_container(60);
        assert_eq!(TelemetrySnapshot::from_writer(&c).compression_ratio, 1.0);
    }

    #[test]
    fn empty_counters_have_zero_ratio() {
        let s = TelemetrySnapshot::from_reader(&ReaderCounters::default());
        assert_eq!(s.compression_ratio, 0.0);
        assert_eq!(s.records, 0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let s = TelemetrySnapshot::from_writer(&make_writer_counters());
        let json = s.to_json().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(json.contains("\"containers\":1"));
    }
}
