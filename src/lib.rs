// src/lib.rs
//! # resdump-rs
//!
//! Decoding of device resource dumps and validation of dump requests against
//! the capabilities a device advertises.
//!
//! A resource dump is a flat buffer of segments. Every segment starts with a
//! one-dword header carrying its type id and its length in dwords; the
//! payload layout depends on the type. The device describes what it can dump
//! in a *menu* segment, one capability record per dump type.
//!
//! ## Features
//!
//! - **Zero-copy framing**: segments share the dump buffer through [`bytes::Bytes`]
//! - **Explicit byte order**: buffers are decoded in a caller-chosen [`Endian`]
//! - **Open dispatch**: new segment types are added through [`SegmentRegistry`]
//! - **Deterministic validation**: a rejected request always yields the same message
//!
//! ## Quick Start
//!
//! ### Decoding a dump buffer
//!
//! ```rust
//! use resdump_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let buffer = DumpBuilder::new(Endian::Little)
//!         .error(3, "Resource busy")
//!         .terminate()
//!         .finish();
//!
//!     for segment in decode_segments(&buffer, Endian::Little)? {
//!         for message in segment.messages() {
//!             println!("{}", message);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Validating a request against the menu
//!
//! ```rust
//! use resdump_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flags = CapabilityFlags {
//!         supports_index1: true,
//!         must_have_index1: true,
//!         ..Default::default()
//!     };
//!     let buffer = DumpBuilder::new(Endian::Big)
//!         .menu(&[CapabilityRecord::new(5, "QP", flags)])?
//!         .finish();
//!
//!     let segments = decode_segments(&buffer, Endian::Big)?;
//!     let menu = segments.iter().find_map(Segment::as_menu).unwrap();
//!
//!     assert!(menu.verify_support(&DumpRequest::new("QP").with_index1(7)).is_ok());
//!     assert!(menu.verify_support(&DumpRequest::new(5u16)).is_err());
//!     Ok(())
//! }
//! ```

// Modules
pub mod error;
pub mod types;
pub mod config;
pub mod segment;
pub mod registry;
pub mod reader;
pub mod writer;
pub mod session;

mod utils;

pub use error::{ResDumpError, Result};

pub use types::{
    DeviceAttributes,
    DumpRequest,
    Endian,
    NumOfObj,
    SegmentSelector,
    SegmentType,
};

pub use config::SessionConfig;

pub use segment::{
    CapabilityFlags,
    CapabilityRecord,
    ErrorSegment,
    MenuSegment,
    Segment,
    SegmentHeader,
    SegmentKind,
};

pub use registry::SegmentRegistry;

pub use reader::{decode_segments, SegmentFramer};

pub use writer::DumpBuilder;

pub use session::{execute, Command, DumpBackend, DumpCommand, DumpSession, QueryCommand};

pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use resdump_rs::prelude::*;
    //! ```

    pub use crate::error::{ResDumpError, Result};
    pub use crate::types::{DumpRequest, Endian, NumOfObj, SegmentSelector, SegmentType};
    pub use crate::segment::{CapabilityFlags, CapabilityRecord, Segment, SegmentKind};
    pub use crate::reader::decode_segments;
    pub use crate::writer::DumpBuilder;
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
