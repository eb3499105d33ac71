// src/config.rs
use crate::types::{DeviceAttributes, DumpRequest, Endian};

/// Everything a session needs to issue one dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub device: DeviceAttributes,
    pub request: DumpRequest,
    /// How many levels of reference segments the device should follow
    pub depth: u32,
    /// Byte order of the buffers the backend returns
    pub endian: Endian,
}

impl SessionConfig {
    pub const DEFAULT_DEPTH: u32 = 0;

    pub fn new(device: DeviceAttributes, request: DumpRequest) -> Self {
        SessionConfig {
            device,
            request,
            depth: Self::DEFAULT_DEPTH,
            endian: Endian::native(),
        }
    }

    pub fn with_request(mut self, request: DumpRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }
}
