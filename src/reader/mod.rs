// src/reader/mod.rs
mod framer;
mod aggregate;

pub use framer::{decode_segments, frame_headers, SegmentFramer};
pub use aggregate::{Aggregator, MergeConsecutive};
