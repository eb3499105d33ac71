// src/utils/mod.rs
mod string_encoding;
mod endian;

pub(crate) use string_encoding::*;
pub(crate) use endian::*;
