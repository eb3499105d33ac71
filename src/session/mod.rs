// src/session/mod.rs
mod backend;
mod command;
mod dump_session;

pub use backend::{DumpBackend, DumpHandle, MemoryBackend, MemoryHandle};
pub use command::{execute, Command, DumpCommand, QueryCommand};
pub use dump_session::{DumpSession, ACQUISITION_OPERATION};
