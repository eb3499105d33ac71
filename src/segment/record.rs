// src/segment/record.rs
use crate::types::Endian;
use crate::utils::{bit, decode_padded_text, encode_padded_text, low_word, read_dword, text_bytes_in_order, write_dword};
use bytemuck::{Pod, Zeroable};

/// On-wire layout of one menu record (13 dwords)
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct RawMenuRecord {
    flags_word: [u8; 4],
    segment_name: [u8; 16],
    index1_name: [u8; 16],
    index2_name: [u8; 16],
}

const _: () = assert!(std::mem::size_of::<RawMenuRecord>() == CapabilityRecord::SIZE);

/// The twelve requirement/support flags of a menu record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CapabilityFlags {
    pub supports_index1: bool,
    pub must_have_index1: bool,
    pub supports_index2: bool,
    pub must_have_index2: bool,
    pub supports_num_of_obj1: bool,
    pub must_have_num_of_obj1: bool,
    pub supports_all_num_of_obj1: bool,
    pub supports_active_num_of_obj1: bool,
    pub supports_num_of_obj2: bool,
    pub must_have_num_of_obj2: bool,
    pub supports_all_num_of_obj2: bool,
    pub supports_active_num_of_obj2: bool,
}

impl CapabilityFlags {
    pub const SUPPORTS_INDEX1: u32 = 20;
    pub const MUST_HAVE_INDEX1: u32 = 21;
    pub const SUPPORTS_INDEX2: u32 = 22;
    pub const MUST_HAVE_INDEX2: u32 = 23;
    pub const SUPPORTS_NUM_OF_OBJ1: u32 = 24;
    pub const MUST_HAVE_NUM_OF_OBJ1: u32 = 25;
    pub const SUPPORTS_ALL_NUM_OF_OBJ1: u32 = 26;
    pub const SUPPORTS_ACTIVE_NUM_OF_OBJ1: u32 = 27;
    pub const SUPPORTS_NUM_OF_OBJ2: u32 = 28;
    pub const MUST_HAVE_NUM_OF_OBJ2: u32 = 29;
    pub const SUPPORTS_ALL_NUM_OF_OBJ2: u32 = 30;
    pub const SUPPORTS_ACTIVE_NUM_OF_OBJ2: u32 = 31;

    /// Extract the flag bits from the first record dword
    pub fn from_dword(dword: u32) -> Self {
        CapabilityFlags {
            supports_index1: bit(dword, Self::SUPPORTS_INDEX1),
            must_have_index1: bit(dword, Self::MUST_HAVE_INDEX1),
            supports_index2: bit(dword, Self::SUPPORTS_INDEX2),
            must_have_index2: bit(dword, Self::MUST_HAVE_INDEX2),
            supports_num_of_obj1: bit(dword, Self::SUPPORTS_NUM_OF_OBJ1),
            must_have_num_of_obj1: bit(dword, Self::MUST_HAVE_NUM_OF_OBJ1),
            supports_all_num_of_obj1: bit(dword, Self::SUPPORTS_ALL_NUM_OF_OBJ1),
            supports_active_num_of_obj1: bit(dword, Self::SUPPORTS_ACTIVE_NUM_OF_OBJ1),
            supports_num_of_obj2: bit(dword, Self::SUPPORTS_NUM_OF_OBJ2),
            must_have_num_of_obj2: bit(dword, Self::MUST_HAVE_NUM_OF_OBJ2),
            supports_all_num_of_obj2: bit(dword, Self::SUPPORTS_ALL_NUM_OF_OBJ2),
            supports_active_num_of_obj2: bit(dword, Self::SUPPORTS_ACTIVE_NUM_OF_OBJ2),
        }
    }

    pub fn to_dword(&self) -> u32 {
        [
            (self.supports_index1, Self::SUPPORTS_INDEX1),
            (self.must_have_index1, Self::MUST_HAVE_INDEX1),
            (self.supports_index2, Self::SUPPORTS_INDEX2),
            (self.must_have_index2, Self::MUST_HAVE_INDEX2),
            (self.supports_num_of_obj1, Self::SUPPORTS_NUM_OF_OBJ1),
            (self.must_have_num_of_obj1, Self::MUST_HAVE_NUM_OF_OBJ1),
            (self.supports_all_num_of_obj1, Self::SUPPORTS_ALL_NUM_OF_OBJ1),
            (self.supports_active_num_of_obj1, Self::SUPPORTS_ACTIVE_NUM_OF_OBJ1),
            (self.supports_num_of_obj2, Self::SUPPORTS_NUM_OF_OBJ2),
            (self.must_have_num_of_obj2, Self::MUST_HAVE_NUM_OF_OBJ2),
            (self.supports_all_num_of_obj2, Self::SUPPORTS_ALL_NUM_OF_OBJ2),
            (self.supports_active_num_of_obj2, Self::SUPPORTS_ACTIVE_NUM_OF_OBJ2),
        ]
        .iter()
        .filter(|&&(set, _)| set)
        .fold(0u32, |acc, &(_, index)| acc | (1u32 << index))
    }

    /// The flags in declaration order
    pub fn to_array(&self) -> [bool; 12] {
        [
            self.supports_index1,
            self.must_have_index1,
            self.supports_index2,
            self.must_have_index2,
            self.supports_num_of_obj1,
            self.must_have_num_of_obj1,
            self.supports_all_num_of_obj1,
            self.supports_active_num_of_obj1,
            self.supports_num_of_obj2,
            self.must_have_num_of_obj2,
            self.supports_all_num_of_obj2,
            self.supports_active_num_of_obj2,
        ]
    }
}

/// One menu entry: a dump type the device supports and how it may be requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRecord {
    segment_type: u16,
    segment_name: String,
    index1_name: String,
    index2_name: String,
    flags: CapabilityFlags,
}

impl CapabilityRecord {
    pub const SIZE: usize = 52;
    pub const BITS: usize = 416;
    pub const NAME_SIZE: usize = 16;

    pub fn new(segment_type: u16, segment_name: impl Into<String>, flags: CapabilityFlags) -> Self {
        CapabilityRecord {
            segment_type,
            segment_name: segment_name.into(),
            index1_name: String::new(),
            index2_name: String::new(),
            flags,
        }
    }

    pub fn with_index_names(mut self, index1: impl Into<String>, index2: impl Into<String>) -> Self {
        self.index1_name = index1.into();
        self.index2_name = index2.into();
        self
    }

    /// Decode one record. Total over any 52-byte block.
    pub fn parse(block: &[u8; Self::SIZE], endian: Endian) -> Self {
        Self::from_raw(bytemuck::cast_ref::<[u8; Self::SIZE], RawMenuRecord>(block), endian)
    }

    pub(crate) fn from_raw(raw: &RawMenuRecord, endian: Endian) -> Self {
        // flags_word is exactly one dword
        let dword = read_dword(&raw.flags_word, 0, endian).unwrap_or_default();
        let text = |field: &[u8; 16]| decode_padded_text(&text_bytes_in_order(field, endian));

        CapabilityRecord {
            segment_type: low_word(dword),
            segment_name: text(&raw.segment_name),
            index1_name: text(&raw.index1_name),
            index2_name: text(&raw.index2_name),
            flags: CapabilityFlags::from_dword(dword),
        }
    }

    pub fn encode(&self, endian: Endian) -> [u8; Self::SIZE] {
        let mut raw = RawMenuRecord::zeroed();
        write_dword(
            &mut raw.flags_word,
            endian,
            self.flags.to_dword() | self.segment_type as u32,
        );
        let text = |value: &str, field: &mut [u8; 16]| {
            let padded = encode_padded_text(value, Self::NAME_SIZE);
            field.copy_from_slice(&text_bytes_in_order(&padded, endian));
        };
        text(&self.segment_name, &mut raw.segment_name);
        text(&self.index1_name, &mut raw.index1_name);
        text(&self.index2_name, &mut raw.index2_name);

        let mut block = [0u8; Self::SIZE];
        block.copy_from_slice(bytemuck::bytes_of(&raw));
        block
    }

    pub fn segment_type(&self) -> u16 {
        self.segment_type
    }

    pub fn segment_name(&self) -> &str {
        &self.segment_name
    }

    pub fn index1_name(&self) -> &str {
        &self.index1_name
    }

    pub fn index2_name(&self) -> &str {
        &self.index2_name
    }

    pub fn flags(&self) -> CapabilityFlags {
        self.flags
    }

    /// Ordered (label, value) pairs for display
    pub fn printable_fields(&self) -> Vec<(&'static str, String)> {
        let f = &self.flags;
        vec![
            ("Segment Type", format!("{:#06x}", self.segment_type)),
            ("Segment Name", self.segment_name.clone()),
            ("Index1", describe_index(f.supports_index1, f.must_have_index1, &self.index1_name)),
            ("Index2", describe_index(f.supports_index2, f.must_have_index2, &self.index2_name)),
            (
                "Num of Obj1",
                describe_num_of_obj(
                    f.supports_num_of_obj1,
                    f.must_have_num_of_obj1,
                    f.supports_all_num_of_obj1,
                    f.supports_active_num_of_obj1,
                ),
            ),
            (
                "Num of Obj2",
                describe_num_of_obj(
                    f.supports_num_of_obj2,
                    f.must_have_num_of_obj2,
                    f.supports_all_num_of_obj2,
                    f.supports_active_num_of_obj2,
                ),
            ),
        ]
    }
}

fn describe_index(supports: bool, must_have: bool, name: &str) -> String {
    let usage = match (supports, must_have) {
        (_, true) => "required",
        (true, false) => "optional",
        (false, false) => return "N/A".to_string(),
    };
    if name.is_empty() {
        usage.to_string()
    } else {
        format!("{} ({})", usage, name)
    }
}

fn describe_num_of_obj(supports: bool, must_have: bool, all: bool, active: bool) -> String {
    let mut parts = Vec::with_capacity(3);
    match (supports, must_have) {
        (_, true) => parts.push("required"),
        (true, false) => parts.push("optional"),
        (false, false) => return "N/A".to_string(),
    }
    if all {
        parts.push("all");
    }
    if active {
        parts.push("active");
    }
    parts.join(", ")
}
