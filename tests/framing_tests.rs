// tests/framing_tests.rs
use bytes::Bytes;
use proptest::prelude::*;
use resdump_rs::reader::{frame_headers, Aggregator, MergeConsecutive};
use resdump_rs::registry::decode_generic;
use resdump_rs::segment::FwVersion;
use resdump_rs::*;

const QP_TYPE: u16 = 0x1001;

fn registry_with_resources() -> SegmentRegistry {
    let mut registry = SegmentRegistry::with_defaults();
    registry.register(QP_TYPE, "qp", decode_generic).unwrap();
    registry
}

fn header_dword(type_id: u16, length_dw: u16, endian: Endian) -> [u8; 4] {
    let dword = ((type_id as u32) << 16) | length_dw as u32;
    match endian {
        Endian::Little => dword.to_le_bytes(),
        Endian::Big => dword.to_be_bytes(),
    }
}

#[test]
fn test_full_dump_in_order() {
    let request = DumpRequest::new(QP_TYPE).with_index1(4).with_num_of_obj1(NumOfObj::All);
    for endian in [Endian::Little, Endian::Big] {
        let buffer = DumpBuilder::new(endian)
            .info(2, 0x20d, FwVersion { major: 22, minor: 39, sub_minor: 1002 })
            .command(QP_TYPE, 3, &request)
            .raw_segment(QP_TYPE, &[0xAA; 16])
            .raw_segment(QP_TYPE, &[0xBB; 8])
            .notice(0, "partial dump")
            .error(9, "Resource busy")
            .terminate()
            .finish();

        let registry = registry_with_resources();
        let segments = SegmentFramer::new(&registry).frame(&buffer, endian).unwrap();
        let kinds: Vec<_> = segments.iter().map(Segment::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["info", "command", "generic", "generic", "notice", "error", "terminate"]
        );

        let total: usize = segments.iter().map(Segment::byte_len).sum();
        assert_eq!(total, buffer.len());
        assert_eq!(segments[0].offset(), 0);
        assert_eq!(segments[1].offset(), 20);
        assert_eq!(segments[2].offset(), 40);

        assert_eq!(
            segments[0].messages().to_vec(),
            vec!["Dump version = 2", "HW version = 0x20d", "FW version = 22.39.1002"]
        );
        let command = segments[1].messages();
        assert_eq!(command[0], "Segment type = 0x1001");
        assert_eq!(command[1], "vHCA id = 3");
        assert_eq!(command[2], "Index1 = 4");
        assert_eq!(command[4], "Num of obj1 = all");
        assert_eq!(segments[4].messages()[0], "Notice message = partial dump");
        assert_eq!(segments[5].messages()[0], "Error message (9) = Resource busy");
        assert!(segments[6].messages().is_empty());
    }
}

#[test]
fn test_unknown_type_fails_the_pass() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&header_dword(SegmentType::Terminate.id(), 1, Endian::Little));
    bytes.extend_from_slice(&header_dword(99, 2, Endian::Little));
    bytes.extend_from_slice(&[0; 4]);

    let err = decode_segments(&Bytes::from(bytes), Endian::Little).unwrap_err();
    assert!(matches!(err, ResDumpError::UnknownSegmentType(99)));
    assert!(err.is_decode_error());
}

#[test]
fn test_overrun_is_truncated() {
    let mut bytes = header_dword(SegmentType::Terminate.id(), 1, Endian::Big).to_vec();
    bytes.extend_from_slice(&header_dword(SegmentType::Error.id(), 12, Endian::Big));
    bytes.extend_from_slice(&[0; 8]);

    let err = decode_segments(&Bytes::from(bytes), Endian::Big).unwrap_err();
    assert!(matches!(
        err,
        ResDumpError::TruncatedBuffer { offset: 4, needed: 48, available: 12 }
    ));
}

#[test]
fn test_zero_length_is_malformed() {
    let bytes = Bytes::copy_from_slice(&header_dword(SegmentType::Terminate.id(), 0, Endian::Little));
    let err = decode_segments(&bytes, Endian::Little).unwrap_err();
    assert!(matches!(err, ResDumpError::MalformedSegment { offset: 0, .. }));
}

#[test]
fn test_partial_header_is_truncated() {
    let err = decode_segments(&Bytes::from_static(&[0xFB, 0xFF]), Endian::Little).unwrap_err();
    assert!(matches!(err, ResDumpError::TruncatedBuffer { offset: 0, .. }));
}

#[test]
fn test_empty_buffer_has_no_segments() {
    assert!(decode_segments(&Bytes::new(), Endian::Little).unwrap().is_empty());
}

#[test]
fn test_decoder_error_offsets_are_absolute() {
    let mut bytes = header_dword(SegmentType::Terminate.id(), 1, Endian::Little).to_vec();
    // Menu claiming two records but carrying none
    bytes.extend_from_slice(&header_dword(SegmentType::Menu.id(), 2, Endian::Little));
    bytes.extend_from_slice(&2u32.to_le_bytes());

    let err = decode_segments(&Bytes::from(bytes), Endian::Little).unwrap_err();
    assert!(matches!(err, ResDumpError::TruncatedBuffer { offset: 12, needed: 104, available: 0 }));
}

#[test]
fn test_aggregation_merges_split_resources() {
    let buffer = DumpBuilder::new(Endian::Little)
        .raw_segment(QP_TYPE, &[1; 8])
        .raw_segment(QP_TYPE, &[2; 4])
        .terminate()
        .raw_segment(QP_TYPE, &[3; 4])
        .finish();
    let registry = registry_with_resources();
    let segments = SegmentFramer::new(&registry).frame(&buffer, Endian::Little).unwrap();
    assert_eq!(segments.len(), 4);

    let merged = MergeConsecutive.aggregate(segments);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].type_id(), QP_TYPE);
    assert_eq!(merged[0].header().length_dw, 4);
    assert_eq!(&merged[0].raw_data()[4..], &[1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2]);
    assert_eq!(merged[1].kind_name(), "terminate");
    assert_eq!(merged[2].raw_data().len(), 8);
}

fn segment_strategy() -> impl Strategy<Value = (u16, Vec<u8>)> {
    let types = prop_oneof![
        Just(SegmentType::Terminate.id()),
        Just(SegmentType::Reference.id()),
        Just(QP_TYPE),
    ];
    (types, prop::collection::vec(any::<u8>(), 0..64)).prop_map(|(ty, mut payload)| {
        if ty == SegmentType::Terminate.id() {
            payload.clear();
        }
        (ty, payload)
    })
}

proptest! {
    #[test]
    fn prop_segments_cover_the_buffer(
        parts in prop::collection::vec(segment_strategy(), 0..20),
        big in any::<bool>(),
    ) {
        let endian = if big { Endian::Big } else { Endian::Little };
        let builder = parts
            .iter()
            .fold(DumpBuilder::new(endian), |b, (ty, payload)| b.raw_segment(*ty, payload));
        let buffer = builder.finish();

        let registry = registry_with_resources();
        let segments = SegmentFramer::new(&registry).frame(&buffer, endian).unwrap();
        prop_assert_eq!(segments.len(), parts.len());

        let consumed: usize = segments.iter().map(|s| s.header().length_dw as usize * 4).sum();
        prop_assert_eq!(consumed, buffer.len());

        let headers = frame_headers(&buffer, endian).unwrap();
        for (header, segment) in headers.iter().zip(&segments) {
            prop_assert_eq!(header, segment.header());
        }
    }
}
