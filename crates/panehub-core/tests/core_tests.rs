use panehub_core::{ErrorKind, HubConfig, OperationError, Panel, PanelId, PanelOrder, Viewport};
use std::io;
use std::path::{Path, PathBuf};

#[test]
fn test_panel_id_display() {
    let id = PanelId::new(7);
    assert_eq!(id, PanelId::new(7));
    assert_eq!(id.0, 7);
    assert_eq!(id.to_string(), "#7");
}

#[test]
fn test_panel_order_is_stable_under_removal() {
    let mut order = PanelOrder::new();
    let ids: Vec<PanelId> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|p| order.push(*p))
        .collect();

    order.remove(ids[0]);
    order.remove(ids[2]);

    assert_eq!(order.len(), 2);
    assert_eq!(order.paths(), vec![PathBuf::from("/b"), PathBuf::from("/d")]);
    assert_eq!(
        order.as_slice(),
        &[Panel::new(ids[1], "/b"), Panel::new(ids[3], "/d")]
    );
}

#[test]
fn test_empty_panel_order() {
    let mut order = PanelOrder::new();
    assert!(order.is_empty());
    assert!(order.remove(PanelId::new(0)).is_none());
    assert!(order.get(PanelId::new(0)).is_none());
    assert!(order.paths().is_empty());
}

#[test]
fn test_io_error_not_found_maps_to_kind() {
    let err = OperationError::io("/gone", io::Error::from(io::ErrorKind::NotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.path(), Some(Path::new("/gone")));

    let err = OperationError::io("/locked", io::Error::from(io::ErrorKind::PermissionDenied));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_backup_failed_keeps_cause() {
    let cause = OperationError::io("/src/a", io::Error::from(io::ErrorKind::PermissionDenied));
    let err = OperationError::backup_failed("/src/a", cause);

    assert_eq!(err.kind(), ErrorKind::BackupFailed);
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("/src/a"));
}

#[test]
fn test_errors_without_paths() {
    assert_eq!(OperationError::NothingToUndo.path(), None);
    let err = OperationError::invalid_name("a/b", "contains a separator");
    assert_eq!(err.kind(), ErrorKind::InvalidName);
    assert!(err.to_string().contains("a/b"));
}

#[test]
fn test_default_config() {
    let config = HubConfig::default();
    assert_eq!(config.max_undo, 10);
    assert_eq!(config.new_folder_name, "New Folder");
    assert_eq!(config.default_capacities, vec![3]);
    assert_eq!(config.favorite_limit, 20);
    assert_eq!(config.viewport, Viewport::new(1200, 800));
}

#[test]
fn test_config_dir_override() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = HubConfig::builder()
        .config_dir(Some(dir.path().to_path_buf()))
        .build()
        .unwrap();

    assert_eq!(config.resolved_config_dir(), dir.path());
    assert_eq!(config.settings_path().parent(), Some(dir.path()));

    // Nothing saved yet, so reloading keeps the built values
    let reloaded = config.reload();
    assert_eq!(reloaded.max_undo, 10);
}

#[test]
fn test_saved_viewport_is_reloaded() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = HubConfig::builder()
        .config_dir(Some(dir.path().to_path_buf()))
        .viewport(Viewport::new(640, 480))
        .build()
        .unwrap();
    config.save().unwrap();

    let reloaded = HubConfig::builder()
        .config_dir(Some(dir.path().to_path_buf()))
        .build()
        .unwrap()
        .reload();
    assert_eq!(reloaded.viewport, Viewport::new(640, 480));
}
