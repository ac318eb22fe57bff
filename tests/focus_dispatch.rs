//! Integration tests for tool dispatch against a file-backed focus store.

use serde_json::{Value, json};

use clearplate::{
    Dashboard,
    config::{StoreBackend, StoreConfig},
    core::{
        catalog::{GET_FOCUS_ITEMS, UPDATE_FOCUS_ITEM, WEEKLY_FOCUS_BOARD},
        focus::{Bucket, FOCUS_ITEMS_KEY, default_focus_items},
    },
};

fn file_dashboard(dir: &tempfile::TempDir) -> Dashboard {
    let config = StoreConfig {
        backend: StoreBackend::File,
        root: Some(dir.path().to_path_buf()),
        ..StoreConfig::default()
    };
    Dashboard::from_config(&config).unwrap()
}

fn blob_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join(format!("{FOCUS_ITEMS_KEY}.json"))
}

fn defaults_json() -> Value {
    serde_json::to_value(default_focus_items()).unwrap()
}

#[test]
fn first_read_seeds_defaults_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);

    let items = dashboard.invoke(GET_FOCUS_ITEMS, &json!({})).unwrap();
    assert_eq!(items, defaults_json());
    assert!(blob_path(&dir).exists());
}

#[test]
fn moving_an_item_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let items = file_dashboard(&dir)
        .invoke(UPDATE_FOCUS_ITEM, &json!({"id": "f3", "bucket": "nextWeek"}))
        .unwrap();
    assert_eq!(items[2]["bucket"], "nextWeek");
    assert_eq!(items[2]["title"], "Cancel trial subscription");

    let reopened = file_dashboard(&dir);
    let stored = reopened.store().load_all();
    assert_eq!(stored[2].bucket, Bucket::NextWeek);
    for (index, item) in stored.iter().enumerate().filter(|(i, _)| *i != 2) {
        assert_eq!(item, &default_focus_items()[index]);
    }
}

#[test]
fn cancel_trial_moves_to_next_week() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);

    let items = dashboard
        .invoke(
            UPDATE_FOCUS_ITEM,
            &json!({"id": "f3", "bucket": "nextWeek", "done": false}),
        )
        .unwrap();

    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(
        items[2],
        json!({"id": "f3", "title": "Cancel trial subscription", "bucket": "nextWeek", "done": false})
    );
    assert_eq!(dashboard.store().load_all()[2].bucket, Bucket::NextWeek);
}

#[test]
fn rejected_arguments_never_touch_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);
    dashboard.store().load_all();
    let before = std::fs::read_to_string(blob_path(&dir)).unwrap();

    let err = dashboard
        .invoke(UPDATE_FOCUS_ITEM, &json!({"bucket": "nextWeek"}))
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(err.violations()[0].field, "id");

    let err = dashboard
        .invoke(UPDATE_FOCUS_ITEM, &json!({"id": "f1", "bucket": "someday"}))
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    assert_eq!(std::fs::read_to_string(blob_path(&dir)).unwrap(), before);
}

#[test]
fn unknown_id_returns_collection_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);

    let items = dashboard
        .invoke(UPDATE_FOCUS_ITEM, &json!({"id": "nope", "done": true}))
        .unwrap();
    assert_eq!(items, defaults_json());
}

#[test]
fn repeated_update_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);
    let args = json!({"id": "f4", "done": true, "title": "Send landlord email today"});

    let first = dashboard.invoke(UPDATE_FOCUS_ITEM, &args).unwrap();
    let second = dashboard.invoke(UPDATE_FOCUS_ITEM, &args).unwrap();
    assert_eq!(first, second);
    assert_eq!(second[3]["title"], "Send landlord email today");
    assert_eq!(second[3]["done"], true);
}

#[test]
fn corrupt_blob_recovers_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(blob_path(&dir), "{not json").unwrap();

    let dashboard = file_dashboard(&dir);
    assert_eq!(dashboard.store().load_all(), default_focus_items());

    let repaired: Value =
        serde_json::from_str(&std::fs::read_to_string(blob_path(&dir)).unwrap()).unwrap();
    assert_eq!(repaired, defaults_json());
}

#[test]
fn board_render_then_reset() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = file_dashboard(&dir);

    dashboard
        .render(
            WEEKLY_FOCUS_BOARD,
            &json!({"items": [{"id": "w1", "title": "Weekly review", "bucket": "thisWeek"}]}),
        )
        .unwrap();
    assert_eq!(dashboard.store().load_all().len(), 1);

    dashboard.store().reset().unwrap();
    assert_eq!(file_dashboard(&dir).store().load_all(), default_focus_items());
}

#[test]
fn capability_definitions_expose_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = serde_json::to_value(file_dashboard(&dir).definitions()).unwrap();
    let update = definitions
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["name"] == UPDATE_FOCUS_ITEM)
        .unwrap();

    assert_eq!(update["inputSchema"]["required"], json!(["id"]));
    assert_eq!(update["inputSchema"]["additionalProperties"], false);
    assert_eq!(update["outputSchema"]["type"], "array");
}
