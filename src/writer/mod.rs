// src/writer/mod.rs
mod dump_builder;

pub use dump_builder::DumpBuilder;
