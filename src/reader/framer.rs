// src/reader/framer.rs
use crate::error::{ResDumpError, Result};
use crate::registry::SegmentRegistry;
use crate::segment::{Segment, SegmentHeader};
use crate::types::Endian;
use bytes::Bytes;
use tracing::{debug, trace};

/// Splits a dump buffer into segments and hands each to its decoder
///
/// A single pass over the buffer: read the header, check the declared size
/// against what is left, resolve the decoder, decode, advance. Any failure
/// ends the pass and no segments are returned.
pub struct SegmentFramer<'r> {
    registry: &'r SegmentRegistry,
}

impl<'r> SegmentFramer<'r> {
    pub fn new(registry: &'r SegmentRegistry) -> Self {
        SegmentFramer { registry }
    }

    pub fn frame(&self, buffer: &Bytes, endian: Endian) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut offset = 0;

        while offset < buffer.len() {
            let header = read_header(buffer, offset, endian)?;
            let decoder = self
                .registry
                .resolve(header.type_id)
                .ok_or(ResDumpError::UnknownSegmentType(header.type_id))?;

            let raw = buffer.slice(offset..header.end_offset());
            let mut segment = decoder
                .decode(raw, endian)
                .map_err(|e| relocate(e, offset))?;
            segment.rebase(offset);

            debug!(
                offset,
                type_id = header.type_id,
                kind = decoder.name,
                size = header.byte_len(),
                "decoded segment"
            );
            offset = header.end_offset();
            segments.push(segment);
        }

        Ok(segments)
    }
}

/// Walk the headers only, returning one per segment in buffer order
pub fn frame_headers(buffer: &[u8], endian: Endian) -> Result<Vec<SegmentHeader>> {
    let mut headers = Vec::new();
    let mut offset = 0;
    while offset < buffer.len() {
        let header = read_header(buffer, offset, endian)?;
        offset = header.end_offset();
        headers.push(header);
    }
    Ok(headers)
}

/// Decode with the process-wide registry
pub fn decode_segments(buffer: &Bytes, endian: Endian) -> Result<Vec<Segment>> {
    let registry = SegmentRegistry::global().read();
    SegmentFramer::new(&registry).frame(buffer, endian)
}

fn read_header(buffer: &[u8], offset: usize, endian: Endian) -> Result<SegmentHeader> {
    let header = SegmentHeader::read(buffer, offset, endian)?;
    trace!(offset, type_id = header.type_id, length_dw = header.length_dw, "segment header");

    if header.length_dw == 0 {
        return Err(ResDumpError::MalformedSegment {
            offset,
            reason: format!("segment type {:#06x} declares zero length", header.type_id),
        });
    }
    let available = buffer.len() - offset;
    if header.byte_len() > available {
        return Err(ResDumpError::truncated(offset, header.byte_len(), available));
    }
    Ok(header)
}

/// Decoders report offsets within their own segment; make them absolute
fn relocate(err: ResDumpError, base: usize) -> ResDumpError {
    match err {
        ResDumpError::TruncatedBuffer { offset, needed, available } => {
            ResDumpError::truncated(base + offset, needed, available)
        }
        ResDumpError::MalformedSegment { offset, reason } => ResDumpError::MalformedSegment {
            offset: base + offset,
            reason,
        },
        other => other,
    }
}
