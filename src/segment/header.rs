// src/segment/header.rs
use crate::error::Result;
use crate::types::{Endian, SegmentType};
use crate::utils::{high_word, low_word, read_dword, DWORD_SIZE};

/// Generic header that opens every segment in a dump buffer
///
/// A single dword: bits [15:0] carry the segment length in dwords (header
/// included), bits [31:16] the segment type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Byte offset of the segment within the dump buffer
    pub offset: usize,
    pub type_id: u16,
    pub length_dw: u16,
}

impl SegmentHeader {
    pub const SIZE: usize = DWORD_SIZE;
    /// Largest segment a 16-bit dword length can describe, header included
    pub const MAX_BYTE_LEN: usize = u16::MAX as usize * DWORD_SIZE;
    pub const MAX_PAYLOAD_LEN: usize = Self::MAX_BYTE_LEN - Self::SIZE;

    pub fn read(bytes: &[u8], offset: usize, endian: Endian) -> Result<Self> {
        let dword = read_dword(bytes, offset, endian)?;
        Ok(SegmentHeader {
            offset,
            type_id: high_word(dword),
            length_dw: low_word(dword),
        })
    }

    pub fn new(type_id: u16, length_dw: u16) -> Self {
        SegmentHeader { offset: 0, type_id, length_dw }
    }

    pub fn to_dword(&self) -> u32 {
        ((self.type_id as u32) << 16) | self.length_dw as u32
    }

    /// Total size of the segment in bytes, header included
    pub fn byte_len(&self) -> usize {
        self.length_dw as usize * DWORD_SIZE
    }

    pub fn payload_len(&self) -> usize {
        self.byte_len().saturating_sub(Self::SIZE)
    }

    pub fn end_offset(&self) -> usize {
        self.offset + self.byte_len()
    }

    pub fn segment_type(&self) -> Option<SegmentType> {
        SegmentType::from_u16(self.type_id)
    }
}
