// src/reader/aggregate.rs
use crate::segment::{GenericSegment, Segment, SegmentHeader, SegmentKind};
use crate::types::Endian;
use crate::utils::{write_dword, DWORD_SIZE};
use bytes::{BufMut, BytesMut};

/// Policy for combining decoded segments when a session runs in aggregate mode
pub trait Aggregator {
    fn aggregate(&self, segments: Vec<Segment>) -> Vec<Segment>;
}

/// Joins runs of consecutive raw segments sharing a type id
///
/// Devices split large resources over several segments of the same type.
/// The merged segment keeps the first header, rewritten with the combined
/// length, followed by every payload in order. A merged segment never
/// grows past [`SegmentHeader::MAX_BYTE_LEN`]; a longer run is joined into
/// several segments. Typed segments such as menu or error are never merged.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeConsecutive;

impl Aggregator for MergeConsecutive {
    fn aggregate(&self, segments: Vec<Segment>) -> Vec<Segment> {
        let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
        let mut run: Vec<GenericSegment> = Vec::new();

        for segment in segments {
            match segment {
                Segment::Generic(generic) => {
                    if run.last().is_some_and(|last| last.header.type_id != generic.header.type_id) {
                        out.extend(merge(std::mem::take(&mut run)));
                    }
                    run.push(generic);
                }
                other => {
                    out.extend(merge(std::mem::take(&mut run)));
                    out.push(other);
                }
            }
        }
        out.extend(merge(run));
        out
    }
}

/// Split a run into batches that fit one segment, then join each batch
fn merge(run: Vec<GenericSegment>) -> Vec<Segment> {
    let mut merged = Vec::new();
    let mut batch: Vec<GenericSegment> = Vec::new();
    let mut batch_len = 0;

    for part in run {
        let len = part.payload().len();
        if !batch.is_empty() && batch_len + len > SegmentHeader::MAX_PAYLOAD_LEN {
            merged.push(join(std::mem::take(&mut batch), batch_len));
            batch_len = 0;
        }
        batch_len += len;
        batch.push(part);
    }
    if !batch.is_empty() {
        merged.push(join(batch, batch_len));
    }
    merged
}

fn join(mut batch: Vec<GenericSegment>, payload_len: usize) -> Segment {
    if batch.len() == 1 {
        return Segment::Generic(batch.remove(0));
    }

    let first = batch[0].header;
    // payload_len is bounded by MAX_PAYLOAD_LEN, so the length fits 16 bits
    let length_dw = ((SegmentHeader::SIZE + payload_len) / DWORD_SIZE) as u16;
    let header = SegmentHeader { length_dw, ..first };

    let mut raw = BytesMut::with_capacity(SegmentHeader::SIZE + payload_len);
    raw.put_slice(&header_bytes(&batch[0].raw_data()[..SegmentHeader::SIZE], &first, &header));
    for part in &batch {
        raw.put_slice(&part.payload());
    }
    Segment::Generic(GenericSegment::from_parts(header, raw.freeze()))
}

/// Encode `header` in the byte order `original` was written in
fn header_bytes(original: &[u8], decoded: &SegmentHeader, header: &SegmentHeader) -> [u8; 4] {
    let endian = if original == decoded.to_dword().to_le_bytes() {
        Endian::Little
    } else {
        Endian::Big
    };
    let mut bytes = [0u8; 4];
    write_dword(&mut bytes, endian, header.to_dword());
    bytes
}
