// src/segment/generic.rs
use crate::error::Result;
use crate::segment::{Messages, SegmentHeader, SegmentKind};
use crate::types::Endian;
use bytes::Bytes;

/// A segment kept as raw bytes
///
/// Used for device resource data, reference and terminate segments, and any
/// type id a caller registers without a dedicated decoder.
#[derive(Debug, Clone)]
pub struct GenericSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
}

impl GenericSegment {
    /// Payload bytes after the generic header
    pub fn payload(&self) -> Bytes {
        self.raw.slice(SegmentHeader::SIZE.min(self.raw.len())..)
    }

    pub(crate) fn from_parts(header: SegmentHeader, raw: Bytes) -> Self {
        GenericSegment { header, raw }
    }
}

impl SegmentKind for GenericSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        Ok(GenericSegment { header, raw })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        Messages::new()
    }
}
