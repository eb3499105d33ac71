// src/types.rs
use std::fmt;

/// Byte order of a dump buffer
///
/// The acquisition service hands back buffers in the host's native order,
/// so sessions use [`Endian::native`]. Decoders take the order explicitly
/// so both layouts can be exercised on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    pub fn is_big_endian(&self) -> bool {
        matches!(self, Endian::Big)
    }

    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }
}

impl Default for Endian {
    fn default() -> Self {
        Self::native()
    }
}

/// Well-known segment types emitted by the device alongside resource data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SegmentType {
    Notice = 0xFFF9,
    Command = 0xFFFA,
    Terminate = 0xFFFB,
    Error = 0xFFFC,
    Reference = 0xFFFD,
    Info = 0xFFFE,
    Menu = 0xFFFF,
}

impl SegmentType {
    pub const ALL: [SegmentType; 7] = [
        SegmentType::Notice,
        SegmentType::Command,
        SegmentType::Terminate,
        SegmentType::Error,
        SegmentType::Reference,
        SegmentType::Info,
        SegmentType::Menu,
    ];

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0xFFF9 => Some(SegmentType::Notice),
            0xFFFA => Some(SegmentType::Command),
            0xFFFB => Some(SegmentType::Terminate),
            0xFFFC => Some(SegmentType::Error),
            0xFFFD => Some(SegmentType::Reference),
            0xFFFE => Some(SegmentType::Info),
            0xFFFF => Some(SegmentType::Menu),
            _ => None,
        }
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn name(&self) -> &'static str {
        match self {
            SegmentType::Notice => "notice",
            SegmentType::Command => "command",
            SegmentType::Terminate => "terminate",
            SegmentType::Error => "error",
            SegmentType::Reference => "reference",
            SegmentType::Info => "info",
            SegmentType::Menu => "menu",
        }
    }
}

/// Requested object count for a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumOfObj {
    /// Every object of the type
    All,
    /// Only the objects currently in use
    Active,
    Count(u16),
}

impl NumOfObj {
    pub const WIRE_ALL: u16 = 0xFFFF;
    pub const WIRE_ACTIVE: u16 = 0xFFFE;

    pub fn to_wire(self) -> u16 {
        match self {
            NumOfObj::All => Self::WIRE_ALL,
            NumOfObj::Active => Self::WIRE_ACTIVE,
            NumOfObj::Count(n) => n,
        }
    }

    /// Zero on the wire means the field was not given
    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            0 => None,
            Self::WIRE_ALL => Some(NumOfObj::All),
            Self::WIRE_ACTIVE => Some(NumOfObj::Active),
            n => Some(NumOfObj::Count(n)),
        }
    }
}

impl fmt::Display for NumOfObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumOfObj::All => write!(f, "all"),
            NumOfObj::Active => write!(f, "active"),
            NumOfObj::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Identifies the dump type a request targets, by numeric id or menu name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentSelector {
    Type(u16),
    Name(String),
}

impl SegmentSelector {
    pub fn type_id(&self) -> Option<u16> {
        match self {
            SegmentSelector::Type(id) => Some(*id),
            SegmentSelector::Name(_) => None,
        }
    }
}

impl fmt::Display for SegmentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentSelector::Type(id) => write!(f, "{}", id),
            SegmentSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u16> for SegmentSelector {
    fn from(id: u16) -> Self {
        SegmentSelector::Type(id)
    }
}

impl From<SegmentType> for SegmentSelector {
    fn from(ty: SegmentType) -> Self {
        SegmentSelector::Type(ty.id())
    }
}

impl From<&str> for SegmentSelector {
    fn from(name: &str) -> Self {
        SegmentSelector::Name(name.to_string())
    }
}

impl From<String> for SegmentSelector {
    fn from(name: String) -> Self {
        SegmentSelector::Name(name)
    }
}

/// A dump request as issued by the caller
///
/// Only validated against the device menu here, never built from dump data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRequest {
    pub segment: SegmentSelector,
    pub index1: Option<u32>,
    pub index2: Option<u32>,
    pub num_of_obj1: Option<NumOfObj>,
    pub num_of_obj2: Option<NumOfObj>,
}

impl DumpRequest {
    pub fn new(segment: impl Into<SegmentSelector>) -> Self {
        DumpRequest {
            segment: segment.into(),
            index1: None,
            index2: None,
            num_of_obj1: None,
            num_of_obj2: None,
        }
    }

    /// Request for the menu segment, the first thing a device is asked for
    pub fn menu() -> Self {
        Self::new(SegmentType::Menu)
    }

    pub fn with_index1(mut self, index1: u32) -> Self {
        self.index1 = Some(index1);
        self
    }

    pub fn with_index2(mut self, index2: u32) -> Self {
        self.index2 = Some(index2);
        self
    }

    pub fn with_num_of_obj1(mut self, num: NumOfObj) -> Self {
        self.num_of_obj1 = Some(num);
        self
    }

    pub fn with_num_of_obj2(mut self, num: NumOfObj) -> Self {
        self.num_of_obj2 = Some(num);
        self
    }
}

/// Opaque device addressing, passed through to the acquisition backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceAttributes {
    pub device_name: String,
    pub vhca_id: Option<u16>,
    pub mem: Option<String>,
}

impl DeviceAttributes {
    pub fn new(device_name: impl Into<String>) -> Self {
        DeviceAttributes {
            device_name: device_name.into(),
            vhca_id: None,
            mem: None,
        }
    }

    pub fn with_vhca_id(mut self, vhca_id: u16) -> Self {
        self.vhca_id = Some(vhca_id);
        self
    }

    pub fn with_mem(mut self, mem: impl Into<String>) -> Self {
        self.mem = Some(mem.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_type_ids() {
        for ty in SegmentType::ALL {
            assert_eq!(SegmentType::from_u16(ty.id()), Some(ty));
        }
        assert_eq!(SegmentType::from_u16(0x1000), None);
        assert_eq!(SegmentType::Menu.name(), "menu");
    }

    #[test]
    fn test_num_of_obj_wire_values() {
        assert_eq!(NumOfObj::All.to_wire(), 0xFFFF);
        assert_eq!(NumOfObj::Active.to_wire(), 0xFFFE);
        assert_eq!(NumOfObj::from_wire(0), None);
        assert_eq!(NumOfObj::from_wire(7), Some(NumOfObj::Count(7)));
        assert_eq!(NumOfObj::from_wire(0xFFFE), Some(NumOfObj::Active));
        assert_eq!(NumOfObj::All.to_string(), "all");
    }

    #[test]
    fn test_request_builder() {
        let req = DumpRequest::new("QP").with_index1(3).with_num_of_obj1(NumOfObj::All);
        assert_eq!(req.segment, SegmentSelector::Name("QP".into()));
        assert_eq!(req.index1, Some(3));
        assert_eq!(req.index2, None);
        assert_eq!(req.num_of_obj1, Some(NumOfObj::All));
        assert_eq!(req.segment.to_string(), "QP");
        assert_eq!(DumpRequest::menu().segment.type_id(), Some(0xFFFF));
    }

    #[test]
    fn test_native_endian() {
        assert!(Endian::native().is_native());
        assert_eq!(Endian::default(), Endian::native());
    }
}
