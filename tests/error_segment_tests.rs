// tests/error_segment_tests.rs
use resdump_rs::*;

fn only_error(buffer: &bytes::Bytes, endian: Endian) -> ErrorSegment {
    let segments = decode_segments(buffer, endian).unwrap();
    segments.iter().find_map(Segment::as_error).unwrap().clone()
}

#[test]
fn test_error_message_both_byte_orders() {
    for endian in [Endian::Little, Endian::Big] {
        let buffer = DumpBuilder::new(endian).error(0x1f, "Resource busy").finish();
        assert_eq!(buffer.len(), 48);
        let error = only_error(&buffer, endian);
        assert_eq!(error.syndrome_id(), Some(0x1f));
        assert_eq!(error.messages().to_vec(), vec!["Error message (31) = Resource busy".to_string()]);
    }
}

#[test]
fn test_little_endian_text_is_dword_reversed_on_the_wire() {
    let buffer = DumpBuilder::new(Endian::Little).error(1, "Bad msg").finish();
    assert_eq!(&buffer[16..24], b" daB\0gsm");
}

#[test]
fn test_wrong_byte_order_is_not_silently_accepted() {
    let buffer = DumpBuilder::new(Endian::Big).error(1, "Bad msg").finish();
    // Read in the wrong order the header claims 0xFCFF dwords
    assert!(decode_segments(&buffer, Endian::Little).is_err());
}

#[test]
fn test_message_fills_slot() {
    let text = "0123456789abcdef0123456789abcdef";
    let buffer = DumpBuilder::new(Endian::Big).error(2, text).finish();
    let error = only_error(&buffer, Endian::Big);
    assert_eq!(error.diagnostic().unwrap().message, text);
}

#[test]
fn test_clean_dump_error_has_no_message() {
    let buffer = DumpBuilder::new(Endian::Little).empty_error().terminate().finish();
    let error = only_error(&buffer, Endian::Little);
    assert!(error.diagnostic().is_none());
    assert!(error.messages().is_empty());
}
