// src/session/backend.rs
//! Boundary to the native dump service
//!
//! The service is opaque here: it takes device addressing plus a request and
//! returns a handle owning the dump bytes. Dropping the handle releases the
//! native resources behind it.

use crate::types::{DeviceAttributes, DumpRequest};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Owned result of one acquisition. Release happens on drop.
pub trait DumpHandle {
    /// Dump bytes in the host's native order
    fn data(&self) -> &[u8];
}

pub trait DumpBackend {
    type Handle: DumpHandle;

    /// Issue one dump. On failure returns the service's diagnostic text.
    fn acquire(
        &self,
        device: &DeviceAttributes,
        request: &DumpRequest,
        depth: u32,
    ) -> std::result::Result<Self::Handle, String>;
}

/// In-memory stand-in for a device
///
/// Serves prepared buffers keyed by the requested segment, and counts
/// acquisitions and releases so callers can check handle discipline.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    dumps: Mutex<HashMap<String, Bytes>>,
    failure: Mutex<Option<String>>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` for requests whose segment displays as `segment`
    /// (a type id in decimal, or a menu name)
    pub fn insert(&self, segment: impl ToString, data: Bytes) {
        self.dumps.lock().insert(segment.to_string(), data);
    }

    /// Make every following acquisition fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

pub struct MemoryHandle {
    data: Bytes,
    released: Arc<AtomicUsize>,
}

impl DumpHandle for MemoryHandle {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl DumpBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn acquire(
        &self,
        device: &DeviceAttributes,
        request: &DumpRequest,
        _depth: u32,
    ) -> std::result::Result<MemoryHandle, String> {
        if let Some(message) = self.failure.lock().clone() {
            return Err(message);
        }
        let data = self
            .dumps
            .lock()
            .get(&request.segment.to_string())
            .cloned()
            .ok_or_else(|| format!("no dump for segment {} on {}", request.segment, device.device_name))?;

        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHandle {
            data,
            released: Arc::clone(&self.released),
        })
    }
}
