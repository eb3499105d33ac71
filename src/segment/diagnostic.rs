// src/segment/diagnostic.rs
use crate::error::{ResDumpError, Result};
use crate::segment::{Messages, SegmentHeader, SegmentKind};
use crate::types::Endian;
use crate::utils::{decode_padded_text, low_word, read_dword, text_bytes_in_order};
use bytemuck::{Pod, Zeroable};
use bytes::Bytes;
use smallvec::smallvec;

/// Body shared by error and notice segments, following the generic header
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct RawDiagnostic {
    pub(crate) syndrome_word: [u8; 4],
    pub(crate) reserved: [u8; 8],
    pub(crate) message: [u8; 32],
}

pub const DIAGNOSTIC_BODY_SIZE: usize = 44;
pub const DIAGNOSTIC_MESSAGE_SIZE: usize = 32;

const _: () = assert!(std::mem::size_of::<RawDiagnostic>() == DIAGNOSTIC_BODY_SIZE);

/// Syndrome id plus the device-provided text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Zero means no syndrome was reported
    pub syndrome_id: u16,
    pub message: String,
}

impl Diagnostic {
    fn format(&self, label: &str) -> String {
        if self.syndrome_id != 0 {
            format!("{} ({}) = {}", label, self.syndrome_id, self.message)
        } else {
            format!("{} = {}", label, self.message)
        }
    }
}

/// Decode the body after the header, if there is one
fn parse_diagnostic(raw: &[u8], header: &SegmentHeader, endian: Endian) -> Result<Option<Diagnostic>> {
    let body = &raw[SegmentHeader::SIZE.min(raw.len())..];
    if body.is_empty() {
        return Ok(None);
    }
    if body.len() < DIAGNOSTIC_BODY_SIZE {
        return Err(ResDumpError::truncated(
            header.offset + SegmentHeader::SIZE,
            DIAGNOSTIC_BODY_SIZE,
            body.len(),
        ));
    }

    let block: &RawDiagnostic = bytemuck::from_bytes(&body[..DIAGNOSTIC_BODY_SIZE]);
    let syndrome_id = low_word(read_dword(&block.syndrome_word, 0, endian)?);
    let message = decode_padded_text(&text_bytes_in_order(&block.message, endian));

    Ok(Some(Diagnostic { syndrome_id, message }))
}

/// Trailing block describing why a dump failed
///
/// Carries no body when the dump completed without error.
#[derive(Debug, Clone)]
pub struct ErrorSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
    diagnostic: Option<Diagnostic>,
}

impl ErrorSegment {
    pub const MESSAGE_NAME: &'static str = "Error message";

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn syndrome_id(&self) -> Option<u16> {
        self.diagnostic.as_ref().map(|d| d.syndrome_id)
    }
}

impl SegmentKind for ErrorSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        let diagnostic = parse_diagnostic(&raw, &header, endian)?;
        Ok(ErrorSegment { header, raw, diagnostic })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        match &self.diagnostic {
            Some(diag) => smallvec![diag.format(Self::MESSAGE_NAME)],
            None => Messages::new(),
        }
    }
}

/// Non-fatal note from the device, same layout as [`ErrorSegment`]
#[derive(Debug, Clone)]
pub struct NoticeSegment {
    pub(crate) header: SegmentHeader,
    raw: Bytes,
    diagnostic: Option<Diagnostic>,
}

impl NoticeSegment {
    pub const MESSAGE_NAME: &'static str = "Notice message";

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }
}

impl SegmentKind for NoticeSegment {
    fn parse(raw: Bytes, endian: Endian) -> Result<Self> {
        let header = SegmentHeader::read(&raw, 0, endian)?;
        let diagnostic = parse_diagnostic(&raw, &header, endian)?;
        Ok(NoticeSegment { header, raw, diagnostic })
    }

    fn header(&self) -> &SegmentHeader {
        &self.header
    }

    fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    fn messages(&self) -> Messages {
        match &self.diagnostic {
            Some(diag) => smallvec![diag.format(Self::MESSAGE_NAME)],
            None => Messages::new(),
        }
    }
}
