// src/segment/menu.rs
use crate::error::{ResDumpError, Result};
use crate::segment::record::{CapabilityRecord, RawMenuRecord};
use crate::segment::{Messages, SegmentHeader, SegmentKind};
use crate::types::{DumpRequest, Endian, NumOfObj, SegmentSelector};
use crate::utils::{low_word, read_dword};
use bytes::Bytes;
use tracing::warn;

/// Directory segment listing every dump type the device supports
///
/// Layout: generic header dword, a sub-header dword whose bits [15:0] hold
/// the record count, then `num_of_records` records of 52 bytes each.
#[derive(Debug, Clone)]
pub struct MenuSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
    records: Vec<CapabilityRecord>,
}

impl MenuSegment {
    pub const SUB_HEADER_SIZE: usize = 8;
    /// Most records one menu segment can hold
    pub const MAX_RECORDS: usize =
        (SegmentHeader::MAX_BYTE_LEN - Self::SUB_HEADER_SIZE) / CapabilityRecord::SIZE;

    pub fn num_of_records(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[CapabilityRecord] {
        &self.records
    }

    pub fn printable_records(&self) -> Vec<Vec<(&'static str, String)>> {
        self.records.iter().map(CapabilityRecord::printable_fields).collect()
    }

    /// Find the record a selector refers to, by type id or by name
    pub fn find(&self, selector: &SegmentSelector) -> Option<&CapabilityRecord> {
        self.records.iter().find(|rec| match selector {
            SegmentSelector::Type(id) => rec.segment_type() == *id,
            SegmentSelector::Name(name) => rec.segment_name() == name,
        })
    }

    /// Translate a menu name such as "QP" into its segment type id
    pub fn segment_type_by_name(&self, name: &str) -> Option<u16> {
        self.records
            .iter()
            .find(|rec| rec.segment_name() == name)
            .map(CapabilityRecord::segment_type)
    }

    /// Check a request against the capabilities the device declared
    ///
    /// Rules are applied in a fixed order and the first violation is
    /// reported, so the same request always yields the same message.
    pub fn verify_support(&self, request: &DumpRequest) -> Result<()> {
        let result = self.check_request(request);
        if let Err(err) = &result {
            warn!(segment = %request.segment, "dump request rejected: {}", err);
        }
        result
    }

    fn check_request(&self, request: &DumpRequest) -> Result<()> {
        let dump_type = &request.segment;
        let rec = self
            .find(dump_type)
            .ok_or_else(|| not_supported(dump_type, "is not supported"))?;
        let flags = rec.flags();

        check_index(dump_type, "index1", request.index1, flags.must_have_index1, flags.supports_index1)?;
        check_index(dump_type, "index2", request.index2, flags.must_have_index2, flags.supports_index2)?;

        check_num_of_obj(
            dump_type,
            "numOfObj1",
            request.num_of_obj1,
            NumOfObjSupport {
                must_have: flags.must_have_num_of_obj1,
                supports: flags.supports_num_of_obj1,
                all: flags.supports_all_num_of_obj1,
                active: flags.supports_active_num_of_obj1,
            },
        )?;
        check_num_of_obj(
            dump_type,
            "numOfObj2",
            request.num_of_obj2,
            NumOfObjSupport {
                must_have: flags.must_have_num_of_obj2,
                supports: flags.supports_num_of_obj2,
                all: flags.supports_all_num_of_obj2,
                active: flags.supports_active_num_of_obj2,
            },
        )?;

        Ok(())
    }
}

struct NumOfObjSupport {
    must_have: bool,
    supports: bool,
    all: bool,
    active: bool,
}

fn not_supported(dump_type: &SegmentSelector, reason: &str) -> ResDumpError {
    ResDumpError::DumpNotSupported(format!("Dump type: {} {}", dump_type, reason))
}

fn check_index(
    dump_type: &SegmentSelector,
    attr: &str,
    value: Option<u32>,
    must_have: bool,
    supports: bool,
) -> Result<()> {
    match value {
        None if must_have => Err(not_supported(
            dump_type,
            &format!("must have {} attribute, and it wasn't provided", attr),
        )),
        Some(_) if !supports => Err(not_supported(
            dump_type,
            &format!("does not support {} attribute, and it was provided", attr),
        )),
        _ => Ok(()),
    }
}

fn check_num_of_obj(
    dump_type: &SegmentSelector,
    attr: &str,
    value: Option<NumOfObj>,
    support: NumOfObjSupport,
) -> Result<()> {
    // A zero count goes out on the wire as "not given"
    let value = match value.filter(|n| *n != NumOfObj::Count(0)) {
        None if support.must_have => {
            return Err(not_supported(
                dump_type,
                &format!("must have {} attribute, and it wasn't provided", attr),
            ))
        }
        None => return Ok(()),
        Some(value) => value,
    };

    if !support.supports {
        return Err(not_supported(
            dump_type,
            &format!("does not support {} attribute, and it was provided", attr),
        ));
    }

    match value {
        NumOfObj::All if !support.all => Err(not_supported(
            dump_type,
            &format!("does not support 'all' as {} attribute", attr),
        )),
        NumOfObj::Active if !support.active => Err(not_supported(
            dump_type,
            &format!("does not support 'active' as {} attribute", attr),
        )),
        _ => Ok(()),
    }
}

impl SegmentKind for MenuSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        let num_of_records = low_word(read_dword(&raw, SegmentHeader::SIZE, endian)?) as usize;

        let end = Self::SUB_HEADER_SIZE + num_of_records * CapabilityRecord::SIZE;
        if end > raw.len() {
            return Err(ResDumpError::truncated(
                Self::SUB_HEADER_SIZE,
                num_of_records * CapabilityRecord::SIZE,
                raw.len() - Self::SUB_HEADER_SIZE,
            ));
        }

        let raw_records: &[RawMenuRecord] = bytemuck::try_cast_slice(&raw[Self::SUB_HEADER_SIZE..end])
            .map_err(|e| ResDumpError::MalformedSegment {
                offset: header.offset,
                reason: format!("menu records: {}", e),
            })?;
        let records = raw_records
            .iter()
            .map(|rec| CapabilityRecord::from_raw(rec, endian))
            .collect();

        Ok(MenuSegment { header, raw, records })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        self.records
            .iter()
            .map(|rec| format!("{:#06x} {}", rec.segment_type(), rec.segment_name()))
            .collect()
    }
}
