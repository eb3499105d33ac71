// src/segment/command.rs
use crate::error::Result;
use crate::segment::{Messages, SegmentHeader, SegmentKind};
use crate::types::{Endian, NumOfObj};
use crate::utils::{high_word, low_word, read_dword};
use bytes::Bytes;

/// Echo of the request the device actually served
#[derive(Debug, Clone)]
pub struct CommandSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
    pub segment_type: u16,
    pub vhca_id: u16,
    pub index1: u32,
    pub index2: u32,
    pub num_of_obj1: Option<NumOfObj>,
    pub num_of_obj2: Option<NumOfObj>,
}

impl SegmentKind for CommandSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        let type_word = read_dword(&raw, 4, endian)?;
        let index1 = read_dword(&raw, 8, endian)?;
        let index2 = read_dword(&raw, 12, endian)?;
        let obj_word = read_dword(&raw, 16, endian)?;

        Ok(CommandSegment {
            header,
            raw,
            segment_type: low_word(type_word),
            vhca_id: high_word(type_word),
            index1,
            index2,
            num_of_obj1: NumOfObj::from_wire(low_word(obj_word)),
            num_of_obj2: NumOfObj::from_wire(high_word(obj_word)),
        })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        let num = |n: Option<NumOfObj>| n.map_or_else(|| "N/A".to_string(), |n| n.to_string());
        [
            format!("Segment type = {:#06x}", self.segment_type),
            format!("vHCA id = {}", self.vhca_id),
            format!("Index1 = {}", self.index1),
            format!("Index2 = {}", self.index2),
            format!("Num of obj1 = {}", num(self.num_of_obj1)),
            format!("Num of obj2 = {}", num(self.num_of_obj2)),
        ]
        .into_iter()
        .collect()
    }
}
