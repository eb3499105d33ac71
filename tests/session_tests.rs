// tests/session_tests.rs
use resdump_rs::registry::decode_generic;
use resdump_rs::session::MemoryBackend;
use resdump_rs::*;
use std::sync::Arc;

const MKEY_TYPE: u16 = 0x1002;

fn register_mkey() {
    let mut registry = SegmentRegistry::global().write();
    if !registry.contains(MKEY_TYPE) {
        registry.register(MKEY_TYPE, "mkey", decode_generic).unwrap();
    }
}

fn device() -> DeviceAttributes {
    DeviceAttributes::new("mlx5_0").with_vhca_id(2).with_mem("rdma0")
}

fn config(request: DumpRequest) -> SessionConfig {
    SessionConfig::new(device(), request).with_endian(Endian::Little)
}

fn menu_bytes() -> bytes::Bytes {
    let mkey = CapabilityRecord::new(
        MKEY_TYPE,
        "MKEY",
        CapabilityFlags {
            supports_index1: true,
            supports_num_of_obj1: true,
            supports_all_num_of_obj1: true,
            ..Default::default()
        },
    );
    DumpBuilder::new(Endian::Little).menu(&[mkey]).unwrap().terminate().finish()
}

fn mkey_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend.insert(SegmentType::Menu.id(), menu_bytes());
    backend.insert(
        MKEY_TYPE,
        DumpBuilder::new(Endian::Little)
            .raw_segment(MKEY_TYPE, &[1; 8])
            .raw_segment(MKEY_TYPE, &[2; 8])
            .empty_error()
            .terminate()
            .finish(),
    );
    backend
}

#[test]
fn test_session_caches_per_mode() {
    register_mkey();
    let backend = mkey_backend();
    {
        let mut session = DumpSession::new(Arc::clone(&backend), config(DumpRequest::new(MKEY_TYPE)));
        assert_eq!(session.segments(false).unwrap().len(), 4);
        assert_eq!(session.segments(true).unwrap().len(), 3);
        assert_eq!(session.segments(false).unwrap().len(), 4);
        assert!(session.messages().unwrap().is_empty());
        assert_eq!(backend.acquired(), 1);
    }
    assert_eq!(backend.released(), 1);
}

#[test]
fn test_released_once_on_decode_error() {
    let backend = Arc::new(MemoryBackend::new());
    backend.insert(7u16, bytes::Bytes::from_static(&[2, 0, 0x63, 0, 0, 0, 0, 0]));
    {
        let mut session = DumpSession::new(Arc::clone(&backend), config(DumpRequest::new(7u16)));
        let err = session.segments(false).unwrap_err();
        assert!(matches!(err, ResDumpError::UnknownSegmentType(0x63)));
        assert!(session.is_fetched());
    }
    assert_eq!(backend.acquired(), 1);
    assert_eq!(backend.released(), 1);
}

#[test]
fn test_acquisition_failure_reports_service_text() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_with("Failed to send access register");
    let mut session = DumpSession::new(Arc::clone(&backend), config(DumpRequest::menu()));
    let err = session.menu().unwrap_err();
    assert_eq!(err.to_string(), "resource dump failed: Failed to send access register");
    drop(session);
    assert_eq!(backend.released(), 0);
}

#[test]
fn test_dump_command_end_to_end() {
    register_mkey();
    let backend = mkey_backend();
    let request = DumpRequest::new("MKEY").with_index1(0x40).with_num_of_obj1(NumOfObj::All);
    let mut command = DumpCommand::new(Arc::clone(&backend), config(request));
    execute(&mut command).unwrap();

    assert_eq!(command.request().segment, SegmentSelector::Type(MKEY_TYPE));
    let segments = command.segments(true).unwrap();
    assert_eq!(segments[0].type_id(), MKEY_TYPE);
    assert_eq!(segments[0].byte_len(), 20);
    assert_eq!(backend.acquired(), 2);
    drop(command);
    assert_eq!(backend.released(), 2);
}

#[test]
fn test_dump_command_rejects_before_dumping() {
    let backend = mkey_backend();
    let request = DumpRequest::new("MKEY").with_index2(1);
    let mut command = DumpCommand::new(Arc::clone(&backend), config(request));
    let err = execute(&mut command).unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(
        err.to_string(),
        "Dump type: MKEY does not support index2 attribute, and it was provided"
    );
    assert!(matches!(command.raw_data().unwrap_err(), ResDumpError::DataNotFetched));
    assert_eq!(backend.acquired(), 1);
    assert_eq!(backend.released(), 1);
}

#[test]
fn test_dump_command_wraps_retrieval_failure() {
    let backend = Arc::new(MemoryBackend::new());
    backend.insert(SegmentType::Menu.id(), menu_bytes());
    let mut command = DumpCommand::new(
        Arc::clone(&backend),
        config(DumpRequest::new(MKEY_TYPE).with_index1(1)),
    );
    let err = execute(&mut command).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed DumpCommand - resource dump failed: no dump for segment 4098 on mlx5_0"
    );
    assert!(matches!(err.root_cause(), ResDumpError::AcquisitionFailed { .. }));
}

#[test]
fn test_query_command_menu() {
    let backend = mkey_backend();
    let mut query = QueryCommand::from_config(Arc::clone(&backend), config(DumpRequest::new(MKEY_TYPE)));
    execute(&mut query).unwrap();
    let menu = query.menu().unwrap();
    assert_eq!(menu.messages().to_vec(), vec!["0x1002 MKEY".to_string()]);
}
