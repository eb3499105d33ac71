// src/segment/info.rs
use crate::error::Result;
use crate::segment::{Messages, SegmentHeader, SegmentKind};
use crate::types::Endian;
use crate::utils::{high_word, low_word, read_dword};
use bytes::Bytes;
use smallvec::smallvec;

/// Dump format and firmware identification emitted at the start of a dump
#[derive(Debug, Clone)]
pub struct InfoSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
    pub dump_version: u8,
    pub hw_version: u32,
    pub fw_version: FwVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FwVersion {
    pub major: u16,
    pub minor: u16,
    pub sub_minor: u32,
}

impl std::fmt::Display for FwVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.sub_minor)
    }
}

impl SegmentKind for InfoSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        let dump_version = (read_dword(&raw, 4, endian)? & 0xFF) as u8;
        let hw_version = read_dword(&raw, 8, endian)?;
        let fw_word = read_dword(&raw, 12, endian)?;
        let sub_minor = read_dword(&raw, 16, endian)?;

        Ok(InfoSegment {
            header,
            raw,
            dump_version,
            hw_version,
            fw_version: FwVersion {
                major: high_word(fw_word),
                minor: low_word(fw_word),
                sub_minor,
            },
        })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        smallvec![
            format!("Dump version = {}", self.dump_version),
            format!("HW version = {:#x}", self.hw_version),
            format!("FW version = {}", self.fw_version),
        ]
    }
}
