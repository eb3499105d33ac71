// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResDumpError {
    #[error("Unknown segment type: {0:#06x}")]
    UnknownSegmentType(u16),

    #[error("Truncated buffer at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedBuffer { offset: usize, needed: usize, available: usize },

    #[error("Malformed segment at offset {offset}: {reason}")]
    MalformedSegment { offset: usize, reason: String },

    #[error("{0}")]
    DumpNotSupported(String),

    #[error("{operation} failed: {message}")]
    AcquisitionFailed { operation: String, message: String },

    #[error("Failed {command} - {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: Box<ResDumpError>,
    },

    #[error("Dump data was not fetched yet")]
    DataNotFetched,

    #[error("Segment type {0:#06x} is already registered")]
    DuplicateSegmentType(u16),

    #[error("Segment type {type_id:#06x} needs {size} bytes, more than its length field can describe")]
    SegmentTooLarge { type_id: u16, size: usize },

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),
}

impl ResDumpError {
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        ResDumpError::TruncatedBuffer { offset, needed, available }
    }

    pub fn acquisition(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ResDumpError::AcquisitionFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn command_failed(command: impl Into<String>, source: ResDumpError) -> Self {
        ResDumpError::CommandFailed {
            command: command.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through command context
    pub fn root_cause(&self) -> &ResDumpError {
        match self {
            ResDumpError::CommandFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True for a rejected request: the caller should change it, not retry.
    pub fn is_validation_error(&self) -> bool {
        matches!(self.root_cause(), ResDumpError::DumpNotSupported(_))
    }

    /// True when the dump buffer itself could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self.root_cause(),
            ResDumpError::UnknownSegmentType(_)
                | ResDumpError::TruncatedBuffer { .. }
                | ResDumpError::MalformedSegment { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ResDumpError>;
