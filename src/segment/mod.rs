// src/segment/mod.rs
//! Typed segments decoded from a resource dump buffer
//!
//! Every kind implements [`SegmentKind`]; the decoded values are carried in
//! the [`Segment`] enum so a dump can be held as one ordered list.

mod header;
mod record;
mod menu;
mod diagnostic;
mod info;
mod command;
mod generic;

pub use header::SegmentHeader;
pub use record::{CapabilityFlags, CapabilityRecord};
pub use menu::MenuSegment;
pub use diagnostic::{Diagnostic, ErrorSegment, NoticeSegment, DIAGNOSTIC_BODY_SIZE, DIAGNOSTIC_MESSAGE_SIZE};
pub use info::{FwVersion, InfoSegment};
pub use command::CommandSegment;
pub use generic::GenericSegment;

use crate::error::Result;
use crate::types::Endian;
use bytes::Bytes;
use smallvec::SmallVec;

/// Printable lines produced by a segment, usually zero or one
pub type Messages = SmallVec<[String; 1]>;

/// Behaviour shared by every segment kind
pub trait SegmentKind: Sized {
    /// Decode one segment. `raw` starts at the generic header and covers
    /// exactly the bytes the header declares.
    fn parse(raw: Bytes, endian: Endian) -> Result<Self>;

    fn header(&self) -> &SegmentHeader;

    fn raw_data(&self) -> &Bytes;

    fn messages(&self) -> Messages;
}

/// A decoded segment of any kind
#[derive(Debug, Clone)]
pub enum Segment {
    Menu(MenuSegment),
    Error(ErrorSegment),
    Notice(NoticeSegment),
    Info(InfoSegment),
    Command(CommandSegment),
    Terminate(GenericSegment),
    Generic(GenericSegment),
}

macro_rules! for_each_kind {
    ($segment:expr, $inner:ident => $body:expr) => {
        match $segment {
            Segment::Menu($inner) => $body,
            Segment::Error($inner) => $body,
            Segment::Notice($inner) => $body,
            Segment::Info($inner) => $body,
            Segment::Command($inner) => $body,
            Segment::Terminate($inner) => $body,
            Segment::Generic($inner) => $body,
        }
    };
}

impl Segment {
    pub fn header(&self) -> &SegmentHeader {
        for_each_kind!(self, s => s.header())
    }

    pub fn type_id(&self) -> u16 {
        self.header().type_id
    }

    pub fn offset(&self) -> usize {
        self.header().offset
    }

    /// Size of the segment in bytes, header included
    pub fn byte_len(&self) -> usize {
        self.raw_data().len()
    }

    pub fn raw_data(&self) -> &Bytes {
        for_each_kind!(self, s => s.raw_data())
    }

    pub fn messages(&self) -> Messages {
        for_each_kind!(self, s => s.messages())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Segment::Menu(_) => "menu",
            Segment::Error(_) => "error",
            Segment::Notice(_) => "notice",
            Segment::Info(_) => "info",
            Segment::Command(_) => "command",
            Segment::Terminate(_) => "terminate",
            Segment::Generic(_) => "generic",
        }
    }

    pub fn as_menu(&self) -> Option<&MenuSegment> {
        match self {
            Segment::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorSegment> {
        match self {
            Segment::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Record where the segment sits in the whole dump buffer
    pub(crate) fn rebase(&mut self, offset: usize) {
        for_each_kind!(self, s => s.header.offset = offset)
    }
}
