use std::fs;
use std::path::PathBuf;

use panehub_core::{HubConfig, PanelId, PanelOrder, Viewport};
use panehub_layout::{
    build_grid, Arrangement, LayoutError, LayoutMode, LayoutSnapshot, LayoutStore,
    LineCapacities, Orientation, SplitChild, SplitNode, SplitTree, DEFAULT_FAVORITE_COLOR,
    FAVORITE_LAYOUTS_DIR, FAVORITES_FILE,
};
use tempfile::TempDir;

fn panels(n: u64) -> Vec<SplitChild> {
    (0..n).map(|i| SplitChild::Panel(PanelId::new(i))).collect()
}

fn first_line_sizes(arr: &Arrangement) -> Vec<u32> {
    match &arr.root().unwrap().children[0] {
        SplitChild::Split(node) => node.sizes.clone(),
        SplitChild::Panel(_) => panic!("expected a line splitter"),
    }
}

#[test]
fn test_grid_of_seven_panels() {
    let mut order = PanelOrder::new();
    for i in 1..=7 {
        order.push(format!("/p{i}"));
    }

    let grid = build_grid(order.as_slice(), &LineCapacities::new([3, 2]));
    let ids: Vec<Vec<u64>> = grid
        .iter()
        .map(|line| line.iter().map(|p| p.id.0).collect())
        .collect();

    assert_eq!(ids, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
}

#[test]
fn test_distribute_hundred_over_three() {
    let mut node = SplitNode::new(Orientation::Horizontal, 100, panels(3));
    node.distribute_equally();
    assert_eq!(node.sizes, vec![34, 33, 33]);
}

#[test]
fn test_restore_with_fewer_children() {
    let saved = SplitTree {
        sizes: vec![100, 200, 300],
        children: vec![None, None, None],
    };
    let mut node = SplitNode::new(Orientation::Horizontal, 600, panels(2));
    node.distribute_equally();

    node.restore(&saved);
    assert_eq!(node.sizes, vec![100, 200]);
}

#[test]
fn test_removing_panel_keeps_matched_sizes() {
    let mut arr = Arrangement::new(&HubConfig::default());
    let ids: Vec<PanelId> = (0..3).map(|i| arr.add_panel(format!("/p{i}"))).collect();
    assert!(arr.set_sizes(&[0], vec![100, 200, 300]));

    let removed = arr.remove_panel(ids[1]).unwrap();
    assert_eq!(removed.path, PathBuf::from("/p1"));
    assert_eq!(first_line_sizes(&arr), vec![100, 200]);
    assert_eq!(arr.order().len(), 2);
}

#[test]
fn test_loaded_snapshot_beats_current_sizes() {
    let mut arr = Arrangement::new(&HubConfig::default());
    arr.add_panel("/a");
    arr.add_panel("/b");
    arr.set_sizes(&[0], vec![1, 1]);

    let json = br#"{
        "layout_mode": "ROW_MODE",
        "line_capacities": [2],
        "panel_paths": ["/x", "/y"],
        "splitter_states": [[800], [[[700, 500], [null, null]]]]
    }"#;
    arr.load_snapshot(LayoutSnapshot::from_json_bytes(json).unwrap());

    assert_eq!(first_line_sizes(&arr), vec![700, 500]);
    assert_eq!(arr.order().paths(), vec![PathBuf::from("/x"), PathBuf::from("/y")]);
}

#[test]
fn test_corrupt_snapshot_loads_with_defaults() {
    let json = br#"{"layout_mode": 5, "line_capacities": "wide", "splitter_states": {"a": 1}}"#;
    let snapshot = LayoutSnapshot::from_json_bytes(json).unwrap();

    let mut arr = Arrangement::new(&HubConfig::default());
    arr.add_panel("/kept");
    arr.load_snapshot(snapshot);

    assert_eq!(arr.mode(), LayoutMode::Columns);
    assert_eq!(arr.capacities(), &LineCapacities::default());
    assert!(arr.order().is_empty());
    assert!(arr.root().is_none());
}

#[test]
fn test_extreme_saved_sizes_fall_back_to_equal_shares() {
    let max = i64::MAX;
    let json = format!(
        r#"{{"panel_paths": ["/a", "/b"], "splitter_states": [[{max}, {max}], [[[{max}, {max}], [null, null]]]]}}"#
    );
    let mut arr = Arrangement::new(&HubConfig::default());
    arr.load_snapshot(LayoutSnapshot::from_json_bytes(json.as_bytes()).unwrap());

    assert_eq!(arr.root().unwrap().sizes, vec![800]);
    assert_eq!(first_line_sizes(&arr), vec![600, 600]);
}

#[test]
fn test_viewport_change_keeps_sizes() {
    let config = HubConfig::builder()
        .viewport(Viewport::new(600, 400))
        .build()
        .unwrap();
    let mut arr = Arrangement::new(&config);
    arr.load_snapshot(LayoutSnapshot {
        panel_paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        ..LayoutSnapshot::default()
    });
    assert_eq!(first_line_sizes(&arr), vec![300, 300]);

    arr.set_viewport(Viewport::new(1000, 400));
    let root = arr.root().unwrap();
    assert_eq!(root.orientation, Orientation::Vertical);
    match &root.children[0] {
        SplitChild::Split(line) => assert_eq!(line.extent, 1000),
        SplitChild::Panel(_) => panic!("expected a line splitter"),
    }
    assert_eq!(first_line_sizes(&arr), vec![300, 300]);
}

#[test]
fn test_session_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = LayoutStore::open_in(dir.path(), 20);
    assert!(store.load_session().unwrap().is_none());

    let mut arr = Arrangement::new(&HubConfig::default());
    arr.add_panel("/a");
    arr.add_panel("/b");
    arr.toggle_mode();
    let snapshot = arr.snapshot();

    store.save_session(&snapshot).unwrap();
    assert_eq!(store.load_session().unwrap(), Some(snapshot));
}

#[test]
fn test_favorite_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut store = LayoutStore::open_in(dir.path(), 20);

    let mut arr = Arrangement::new(&HubConfig::default());
    arr.add_panel("/work");
    arr.set_capacities(LineCapacities::parse("1"));
    let snapshot = arr.snapshot();

    let entry = store.add_favorite("Work", &snapshot).unwrap();
    assert_eq!(entry.color, DEFAULT_FAVORITE_COLOR);
    assert_eq!(store.load_favorite("Work").unwrap(), snapshot);

    store.set_favorite_color("Work", "#32E09D").unwrap();
    let reopened = LayoutStore::open_in(dir.path(), 20);
    assert_eq!(reopened.favorite("Work").unwrap().color, "#32E09D");

    let removed = store.delete_favorite("Work").unwrap();
    assert!(removed.path.exists());
    assert!(matches!(
        store.load_favorite("Work"),
        Err(LayoutError::UnknownFavorite(_))
    ));
}

#[test]
fn test_favorite_with_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut store = LayoutStore::open_in(dir.path(), 20);
    let entry_path = store
        .add_favorite("Gone", &LayoutSnapshot::default())
        .unwrap()
        .path
        .clone();
    fs::remove_file(entry_path).unwrap();

    assert!(matches!(
        store.load_favorite("Gone"),
        Err(LayoutError::FavoriteFileMissing { .. })
    ));
}

#[test]
fn test_overwrite_favorite_keeps_file() {
    let dir = TempDir::new().unwrap();
    let mut store = LayoutStore::open_in(dir.path(), 20);
    let path = store
        .add_favorite("Daily", &LayoutSnapshot::default())
        .unwrap()
        .path
        .clone();

    let updated = LayoutSnapshot {
        layout_mode: LayoutMode::Columns,
        ..LayoutSnapshot::default()
    };
    store.overwrite_favorite("Daily", &updated).unwrap();

    assert_eq!(store.favorite("Daily").unwrap().path, path);
    assert_eq!(store.load_favorite("Daily").unwrap(), updated);
}

#[test]
fn test_reset_favorites_removes_files() {
    let dir = TempDir::new().unwrap();
    let mut store = LayoutStore::open_in(dir.path(), 20);
    store.add_favorite("One", &LayoutSnapshot::default()).unwrap();
    store.add_favorite("Two", &LayoutSnapshot::default()).unwrap();

    store.reset_favorites().unwrap();

    assert_eq!(store.favorites().count(), 0);
    assert!(!dir.path().join(FAVORITES_FILE).exists());
    assert!(!dir.path().join(FAVORITE_LAYOUTS_DIR).exists());
}
