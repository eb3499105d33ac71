// src/session/dump_session.rs
use crate::config::SessionConfig;
use crate::error::{ResDumpError, Result};
use crate::reader::{decode_segments, Aggregator, MergeConsecutive};
use crate::segment::{MenuSegment, Segment};
use crate::session::backend::{DumpBackend, DumpHandle};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name used for acquisition failures raised by a session
pub const ACQUISITION_OPERATION: &str = "resource dump";

/// One dump, fetched lazily and decoded at most once per mode
///
/// The first call to [`raw_data`](Self::raw_data) performs the single
/// acquisition; the native handle is kept until the session is dropped and
/// released exactly once then. Decoded segments are cached separately for
/// plain and aggregated reads.
pub struct DumpSession<B: DumpBackend> {
    backend: Arc<B>,
    config: SessionConfig,
    aggregator: Box<dyn Aggregator>,
    handle: Option<B::Handle>,
    raw_data: Option<Bytes>,
    segments: Option<Vec<Segment>>,
    aggregated: Option<Vec<Segment>>,
}

impl<B: DumpBackend> DumpSession<B> {
    pub fn new(backend: Arc<B>, config: SessionConfig) -> Self {
        DumpSession {
            backend,
            config,
            aggregator: Box::new(MergeConsecutive),
            handle: None,
            raw_data: None,
            segments: None,
            aggregated: None,
        }
    }

    pub fn with_aggregator(mut self, aggregator: impl Aggregator + 'static) -> Self {
        self.aggregator = Box::new(aggregator);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_fetched(&self) -> bool {
        self.raw_data.is_some()
    }

    /// The dump bytes, acquiring them on first use
    pub fn raw_data(&mut self) -> Result<Bytes> {
        if let Some(raw) = &self.raw_data {
            return Ok(raw.clone());
        }

        let config = &self.config;
        info!(
            device = %config.device.device_name,
            segment = %config.request.segment,
            depth = config.depth,
            "acquiring resource dump"
        );
        let handle = self
            .backend
            .acquire(&config.device, &config.request, config.depth)
            .map_err(|message| {
                warn!(device = %config.device.device_name, "resource dump failed: {}", message);
                ResDumpError::acquisition(ACQUISITION_OPERATION, message)
            })?;

        let raw = Bytes::copy_from_slice(handle.data());
        debug!(size = raw.len(), "resource dump acquired");
        self.handle = Some(handle);
        self.raw_data = Some(raw.clone());
        Ok(raw)
    }

    /// Decoded segments, optionally aggregated
    pub fn segments(&mut self, aggregate: bool) -> Result<&[Segment]> {
        if self.cached(aggregate).is_none() {
            let raw = self.raw_data()?;
            let decoded = decode_segments(&raw, self.config.endian)?;
            let decoded = if aggregate {
                self.aggregator.aggregate(decoded)
            } else {
                decoded
            };
            debug!(count = decoded.len(), aggregate, "segments decoded");

            if aggregate {
                self.aggregated = Some(decoded);
            } else {
                self.segments = Some(decoded);
            }
        }
        Ok(self.cached(aggregate).map(Vec::as_slice).unwrap_or(&[]))
    }

    fn cached(&self, aggregate: bool) -> Option<&Vec<Segment>> {
        if aggregate {
            self.aggregated.as_ref()
        } else {
            self.segments.as_ref()
        }
    }

    /// The menu segment of this dump
    pub fn menu(&mut self) -> Result<&MenuSegment> {
        self.segments(false)?
            .iter()
            .find_map(Segment::as_menu)
            .ok_or_else(|| ResDumpError::SegmentNotFound("menu".to_string()))
    }

    /// Messages of every segment, in buffer order
    pub fn messages(&mut self) -> Result<Vec<String>> {
        Ok(self
            .segments(false)?
            .iter()
            .flat_map(|segment| segment.messages())
            .collect())
    }
}

impl<B: DumpBackend> Drop for DumpSession<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(device = %self.config.device.device_name, "releasing resource dump handle");
            drop(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::backend::MemoryBackend;
    use crate::types::{DeviceAttributes, DumpRequest, Endian};
    use crate::writer::DumpBuilder;

    fn config(request: DumpRequest) -> SessionConfig {
        SessionConfig::new(DeviceAttributes::new("mlx5_0"), request).with_endian(Endian::Little)
    }

    #[test]
    fn test_acquires_once() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert(7u16, DumpBuilder::new(Endian::Little).error(2, "oops").finish());

        {
            let mut session = DumpSession::new(Arc::clone(&backend), config(DumpRequest::new(7u16)));
            assert!(!session.is_fetched());
            let first = session.raw_data().unwrap();
            let second = session.raw_data().unwrap();
            assert_eq!(first, second);
            assert_eq!(session.segments(false).unwrap().len(), 1);
            assert_eq!(session.segments(true).unwrap().len(), 1);
            assert_eq!(session.messages().unwrap(), vec!["Error message (2) = oops".to_string()]);
            assert_eq!(backend.acquired(), 1);
            assert_eq!(backend.released(), 0);
        }
        assert_eq!(backend.released(), 1);
    }

    #[test]
    fn test_failed_acquisition_not_cached() {
        let backend = Arc::new(MemoryBackend::new());
        let mut session = DumpSession::new(Arc::clone(&backend), config(DumpRequest::new(7u16)));
        let err = session.raw_data().unwrap_err();
        assert!(matches!(err, ResDumpError::AcquisitionFailed { .. }));

        backend.insert(7u16, DumpBuilder::new(Endian::Little).terminate().finish());
        assert_eq!(session.raw_data().unwrap().len(), 4);
        drop(session);
        assert_eq!(backend.released(), 1);
    }

    #[test]
    fn test_missing_menu() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert(7u16, DumpBuilder::new(Endian::Little).terminate().finish());
        let mut session = DumpSession::new(backend, config(DumpRequest::new(7u16)));
        assert!(matches!(session.menu().unwrap_err(), ResDumpError::SegmentNotFound(_)));
    }

    #[test]
    fn test_never_fetched_releases_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        drop(DumpSession::new(Arc::clone(&backend), config(DumpRequest::menu())));
        assert_eq!(backend.released(), 0);
    }
}
