// src/writer/dump_builder.rs
use crate::error::{ResDumpError, Result};
use crate::segment::{CapabilityRecord, FwVersion, MenuSegment, SegmentHeader, DIAGNOSTIC_MESSAGE_SIZE};
use crate::types::{DumpRequest, Endian, SegmentType};
use crate::utils::{encode_padded_text, text_bytes_in_order, DWORD_SIZE};
use bytes::{BufMut, Bytes, BytesMut};

/// Assembles a dump buffer segment by segment in a chosen byte order
///
/// Produces the same layout a device hands back, which makes it the source
/// of fixtures for decoding and of data for simulated backends.
///
/// # Example
///
/// ```
/// use resdump_rs::writer::DumpBuilder;
/// use resdump_rs::reader::decode_segments;
/// use resdump_rs::types::Endian;
///
/// let buffer = DumpBuilder::new(Endian::Little)
///     .error(3, "device busy")
///     .terminate()
///     .finish();
///
/// let segments = decode_segments(&buffer, Endian::Little).unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].messages()[0], "Error message (3) = device busy");
/// ```
pub struct DumpBuilder {
    buffer: BytesMut,
    endian: Endian,
    segment_count: usize,
}

impl DumpBuilder {
    pub fn new(endian: Endian) -> Self {
        Self::with_capacity(endian, 1024)
    }

    pub fn with_capacity(endian: Endian, capacity: usize) -> Self {
        DumpBuilder {
            buffer: BytesMut::with_capacity(capacity),
            endian,
            segment_count: 0,
        }
    }

    /// Builder in the host's byte order, as a live device would produce
    pub fn native() -> Self {
        Self::new(Endian::native())
    }

    fn put_dword(&mut self, value: u32) {
        match self.endian {
            Endian::Little => self.buffer.put_u32_le(value),
            Endian::Big => self.buffer.put_u32(value),
        }
    }

    fn put_text(&mut self, text: &str, width: usize) {
        let padded = encode_padded_text(text, width);
        self.buffer.put_slice(&text_bytes_in_order(&padded, self.endian));
    }

    /// Callers keep `payload_len` within [`SegmentHeader::MAX_PAYLOAD_LEN`]
    fn put_header(&mut self, type_id: u16, payload_len: usize) {
        debug_assert!(payload_len <= SegmentHeader::MAX_PAYLOAD_LEN);
        let length_dw = ((SegmentHeader::SIZE + payload_len) / DWORD_SIZE) as u16;
        self.put_dword(SegmentHeader::new(type_id, length_dw).to_dword());
        self.segment_count += 1;
    }

    /// Segment with an arbitrary payload, zero-padded to a whole dword
    ///
    /// A payload longer than [`SegmentHeader::MAX_PAYLOAD_LEN`] is split over
    /// consecutive segments of the same type, the way devices emit large
    /// resources. [`MergeConsecutive`](crate::reader::MergeConsecutive)
    /// joins them back up to the same limit.
    pub fn raw_segment(mut self, type_id: u16, payload: &[u8]) -> Self {
        if payload.is_empty() {
            self.put_header(type_id, 0);
            return self;
        }
        for chunk in payload.chunks(SegmentHeader::MAX_PAYLOAD_LEN) {
            let padded_len = chunk.len().div_ceil(DWORD_SIZE) * DWORD_SIZE;
            self.put_header(type_id, padded_len);
            self.buffer.put_slice(chunk);
            self.buffer.put_bytes(0, padded_len - chunk.len());
        }
        self
    }

    /// Menu segment listing `records`
    ///
    /// A menu cannot be split, so more than [`MenuSegment::MAX_RECORDS`]
    /// records is [`ResDumpError::SegmentTooLarge`].
    pub fn menu(mut self, records: &[CapabilityRecord]) -> Result<Self> {
        let payload_len = MenuSegment::SUB_HEADER_SIZE - SegmentHeader::SIZE + records.len() * CapabilityRecord::SIZE;
        if records.len() > MenuSegment::MAX_RECORDS {
            return Err(ResDumpError::SegmentTooLarge {
                type_id: SegmentType::Menu.id(),
                size: SegmentHeader::SIZE + payload_len,
            });
        }
        self.put_header(SegmentType::Menu.id(), payload_len);
        self.put_dword(records.len() as u32);
        for record in records {
            let block = record.encode(self.endian);
            self.buffer.put_slice(&block);
        }
        Ok(self)
    }

    fn diagnostic(mut self, ty: SegmentType, syndrome_id: u16, message: &str) -> Self {
        self.put_header(ty.id(), 12 + DIAGNOSTIC_MESSAGE_SIZE);
        self.put_dword(syndrome_id as u32);
        self.put_dword(0);
        self.put_dword(0);
        self.put_text(message, DIAGNOSTIC_MESSAGE_SIZE);
        self
    }

    pub fn error(self, syndrome_id: u16, message: &str) -> Self {
        self.diagnostic(SegmentType::Error, syndrome_id, message)
    }

    /// Error segment carrying only its header: the dump completed cleanly
    pub fn empty_error(mut self) -> Self {
        self.put_header(SegmentType::Error.id(), 0);
        self
    }

    pub fn notice(self, syndrome_id: u16, message: &str) -> Self {
        self.diagnostic(SegmentType::Notice, syndrome_id, message)
    }

    pub fn info(mut self, dump_version: u8, hw_version: u32, fw_version: FwVersion) -> Self {
        self.put_header(SegmentType::Info.id(), 16);
        self.put_dword(dump_version as u32);
        self.put_dword(hw_version);
        self.put_dword(((fw_version.major as u32) << 16) | fw_version.minor as u32);
        self.put_dword(fw_version.sub_minor);
        self
    }

    /// Echo of a request whose segment has already been resolved to `type_id`
    pub fn command(mut self, type_id: u16, vhca_id: u16, request: &DumpRequest) -> Self {
        let wire = |n: Option<crate::types::NumOfObj>| n.map_or(0, |n| n.to_wire()) as u32;
        self.put_header(SegmentType::Command.id(), 16);
        self.put_dword(((vhca_id as u32) << 16) | type_id as u32);
        self.put_dword(request.index1.unwrap_or(0));
        self.put_dword(request.index2.unwrap_or(0));
        self.put_dword((wire(request.num_of_obj2) << 16) | wire(request.num_of_obj1));
        self
    }

    pub fn terminate(mut self) -> Self {
        self.put_header(SegmentType::Terminate.id(), 0);
        self
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn finish(self) -> Bytes {
        self.buffer.freeze()
    }
}
