// src/session/command.rs
//! Validate-then-retrieve commands against a dump backend

use crate::config::SessionConfig;
use crate::error::{ResDumpError, Result};
use crate::segment::{MenuSegment, Segment};
use crate::session::backend::DumpBackend;
use crate::session::dump_session::DumpSession;
use crate::types::{DeviceAttributes, DumpRequest, Endian, SegmentSelector};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

pub trait Command {
    fn name(&self) -> &str;

    /// Check the command can run; called before any data is retrieved
    fn validate(&mut self) -> Result<()>;

    fn retrieve_data(&mut self) -> Result<()>;
}

/// Run `command`: validate, then retrieve
///
/// Validation errors are returned as they are. Retrieval errors are wrapped
/// in [`ResDumpError::CommandFailed`] naming the command.
pub fn execute<C: Command + ?Sized>(command: &mut C) -> Result<()> {
    command.validate()?;
    debug!(command = command.name(), "retrieving data");
    command
        .retrieve_data()
        .map_err(|e| ResDumpError::command_failed(command.name(), e))
}

/// Fetches the menu segment of a device
pub struct QueryCommand<B: DumpBackend> {
    session: DumpSession<B>,
}

impl<B: DumpBackend> QueryCommand<B> {
    pub fn new(backend: Arc<B>, device: DeviceAttributes) -> Self {
        Self::from_config(backend, SessionConfig::new(device, DumpRequest::menu()))
    }

    /// Menu query using the device, depth and byte order of `config`
    pub fn from_config(backend: Arc<B>, config: SessionConfig) -> Self {
        QueryCommand {
            session: DumpSession::new(backend, config.with_request(DumpRequest::menu())),
        }
    }

    pub fn menu(&mut self) -> Result<&MenuSegment> {
        self.session.menu()
    }

    pub fn segments(&mut self) -> Result<&[Segment]> {
        self.session.segments(false)
    }
}

impl<B: DumpBackend> Command for QueryCommand<B> {
    fn name(&self) -> &str {
        "QueryCommand"
    }

    fn validate(&mut self) -> Result<()> {
        Ok(())
    }

    fn retrieve_data(&mut self) -> Result<()> {
        self.session.raw_data().map(|_| ())
    }
}

/// Dumps one resource after checking the request against the device menu
pub struct DumpCommand<B: DumpBackend> {
    backend: Arc<B>,
    config: SessionConfig,
    session: Option<DumpSession<B>>,
}

impl<B: DumpBackend> DumpCommand<B> {
    pub fn new(backend: Arc<B>, config: SessionConfig) -> Self {
        DumpCommand {
            backend,
            config,
            session: None,
        }
    }

    /// The request as it will be issued; name selectors become type ids
    /// once validation has run
    pub fn request(&self) -> &DumpRequest {
        &self.config.request
    }

    fn session(&mut self) -> Result<&mut DumpSession<B>> {
        self.session.as_mut().ok_or(ResDumpError::DataNotFetched)
    }

    pub fn raw_data(&mut self) -> Result<Bytes> {
        self.session()?.raw_data()
    }

    pub fn segments(&mut self, aggregate: bool) -> Result<&[Segment]> {
        self.session()?.segments(aggregate)
    }

    pub fn messages(&mut self) -> Result<Vec<String>> {
        self.session()?.messages()
    }

    pub fn endian(&self) -> Endian {
        self.config.endian
    }
}

impl<B: DumpBackend> Command for DumpCommand<B> {
    fn name(&self) -> &str {
        "DumpCommand"
    }

    fn validate(&mut self) -> Result<()> {
        let mut query = QueryCommand::from_config(Arc::clone(&self.backend), self.config.clone());
        execute(&mut query)?;
        let menu = query.menu()?;
        menu.verify_support(&self.config.request)?;

        if let SegmentSelector::Name(name) = &self.config.request.segment {
            let type_id = menu
                .segment_type_by_name(name)
                .ok_or_else(|| ResDumpError::DumpNotSupported(format!("Dump type: {} is not supported", name)))?;
            debug!(name = %name, type_id, "resolved segment name");
            self.config.request.segment = SegmentSelector::Type(type_id);
        }
        Ok(())
    }

    fn retrieve_data(&mut self) -> Result<()> {
        let mut session = DumpSession::new(Arc::clone(&self.backend), self.config.clone());
        session.raw_data()?;
        self.session = Some(session);
        Ok(())
    }
}
