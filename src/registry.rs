// src/registry.rs
//! Mapping from segment type id to decoder
//!
//! The framer consults a [`SegmentRegistry`] for every header it reads. A
//! process-wide registry pre-loaded with the well-known kinds is available
//! through [`SegmentRegistry::global`]; callers that decode device resource
//! types register them there (or in a private registry) before decoding.

use crate::error::{ResDumpError, Result};
use crate::segment::{
    CommandSegment, ErrorSegment, GenericSegment, InfoSegment, MenuSegment, NoticeSegment, Segment,
    SegmentKind,
};
use crate::types::{Endian, SegmentType};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Builds a typed segment from the bytes of exactly one segment
pub type DecodeFn = fn(Bytes, Endian) -> Result<Segment>;

#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl Decoder {
    pub fn decode(&self, raw: Bytes, endian: Endian) -> Result<Segment> {
        (self.decode)(raw, endian)
    }
}

#[derive(Debug, Default)]
pub struct SegmentRegistry {
    decoders: HashMap<u16, Decoder>,
}

fn decode_menu(raw: Bytes, endian: Endian) -> Result<Segment> {
    MenuSegment::parse(raw, endian).map(Segment::Menu)
}

fn decode_error(raw: Bytes, endian: Endian) -> Result<Segment> {
    ErrorSegment::parse(raw, endian).map(Segment::Error)
}

fn decode_notice(raw: Bytes, endian: Endian) -> Result<Segment> {
    NoticeSegment::parse(raw, endian).map(Segment::Notice)
}

fn decode_info(raw: Bytes, endian: Endian) -> Result<Segment> {
    InfoSegment::parse(raw, endian).map(Segment::Info)
}

fn decode_command(raw: Bytes, endian: Endian) -> Result<Segment> {
    CommandSegment::parse(raw, endian).map(Segment::Command)
}

fn decode_terminate(raw: Bytes, endian: Endian) -> Result<Segment> {
    GenericSegment::parse(raw, endian).map(Segment::Terminate)
}

/// Keeps the segment as raw bytes; register it for resource types that
/// need no interpretation here.
pub fn decode_generic(raw: Bytes, endian: Endian) -> Result<Segment> {
    GenericSegment::parse(raw, endian).map(Segment::Generic)
}

impl SegmentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding decoders for every [`SegmentType`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults: [(SegmentType, DecodeFn); 7] = [
            (SegmentType::Menu, decode_menu),
            (SegmentType::Error, decode_error),
            (SegmentType::Notice, decode_notice),
            (SegmentType::Info, decode_info),
            (SegmentType::Command, decode_command),
            (SegmentType::Terminate, decode_terminate),
            (SegmentType::Reference, decode_generic),
        ];
        for (ty, decode) in defaults {
            registry
                .decoders
                .insert(ty.id(), Decoder { name: ty.name(), decode });
        }
        registry
    }

    /// The process-wide registry, created with the defaults on first use
    pub fn global() -> &'static RwLock<SegmentRegistry> {
        static GLOBAL: OnceLock<RwLock<SegmentRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(SegmentRegistry::with_defaults()))
    }

    /// Associate `type_id` with a decoder
    ///
    /// Each id may be registered once; a second registration is reported as
    /// [`ResDumpError::DuplicateSegmentType`] and leaves the first in place.
    pub fn register(&mut self, type_id: u16, name: &'static str, decode: DecodeFn) -> Result<()> {
        if self.decoders.contains_key(&type_id) {
            return Err(ResDumpError::DuplicateSegmentType(type_id));
        }
        debug!(type_id, name, "registered segment decoder");
        self.decoders.insert(type_id, Decoder { name, decode });
        Ok(())
    }

    pub fn resolve(&self, type_id: u16) -> Option<&Decoder> {
        self.decoders.get(&type_id)
    }

    pub fn contains(&self, type_id: u16) -> bool {
        self.decoders.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered ids in ascending order
    pub fn type_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.decoders.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
