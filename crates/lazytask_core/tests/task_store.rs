use lazytask_core::{StoreError, TaskEdit, TaskStore};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> (TaskStore<lazytask_core::JsonFileTaskRepository>, PathBuf) {
    let path = dir.path().join("tasks.json");
    (TaskStore::open(&path), path)
}

fn texts<'a>(tasks: impl IntoIterator<Item = &'a lazytask_core::Task>) -> Vec<&'a str> {
    tasks.into_iter().map(|task| task.text.as_str()).collect()
}

#[test]
fn missing_file_opens_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (store, path) = store_in(&dir);

    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn create_appends_pending_task_with_default_priority() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(&dir);

    store
        .create("Write report", Some("2025-02-01".to_string()), Some("High".to_string()))
        .unwrap();
    let id = store.create("Water plants", None, None).unwrap();

    let last = store.list().last().unwrap();
    assert_eq!(last.id, id);
    assert_eq!(last.text, "Water plants");
    assert!(!last.completed);
    assert_eq!(last.deadline, None);
    assert_eq!(last.priority, "Medium");
}

#[test]
fn reopened_store_matches_state_before_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_in(&dir);

    store.create("a", Some("2025-01-01".to_string()), None).unwrap();
    store.create("b", None, Some("Low".to_string())).unwrap();
    store.create("c", None, None).unwrap();
    store.complete(2).unwrap();
    store
        .update(
            0,
            TaskEdit {
                text: "a2".to_string(),
                deadline: Some("2025-06-30".to_string()),
                priority: Some("High".to_string()),
            },
        )
        .unwrap();
    store.delete(1).unwrap();
    let before = store.list().to_vec();

    let reopened = TaskStore::open(&path);
    assert_eq!(reopened.list(), before.as_slice());
}

#[test]
fn complete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_in(&dir);
    store.create("laundry", None, None).unwrap();

    store.complete(0).unwrap();
    let once = (store.list().to_vec(), fs::read(&path).unwrap());
    store.complete(0).unwrap();
    let twice = (store.list().to_vec(), fs::read(&path).unwrap());

    assert_eq!(once, twice);
    assert!(store.get(0).unwrap().completed);
}

#[test]
fn delete_removes_one_and_shifts_later_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(&dir);
    for text in ["zero", "one", "two", "three"] {
        store.create(text, None, None).unwrap();
    }
    let before = store.list().to_vec();

    let removed = store.delete(1).unwrap();

    assert_eq!(removed.text, "one");
    assert_eq!(store.len(), before.len() - 1);
    assert_eq!(store.list()[0], before[0]);
    assert_eq!(store.list()[1..], before[2..]);
}

#[test]
fn update_preserves_completion_and_identity() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(&dir);
    let id = store.create("draft", None, Some("Low".to_string())).unwrap();
    store.complete(0).unwrap();

    store
        .update(
            0,
            TaskEdit {
                text: "final".to_string(),
                deadline: Some("2025-12-24".to_string()),
                priority: Some("High".to_string()),
            },
        )
        .unwrap();

    let task = store.get(0).unwrap();
    assert_eq!(task.id, id);
    assert!(task.completed);
    assert_eq!(task.text, "final");
    assert_eq!(task.deadline.as_deref(), Some("2025-12-24"));
    assert_eq!(task.priority, "High");
}

#[test]
fn list_by_status_splits_buy_milk_and_call_bank() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(&dir);

    store
        .create("Buy milk", Some("2025-01-10".to_string()), Some("High".to_string()))
        .unwrap();
    store.create("Call bank", None, Some("Low".to_string())).unwrap();
    assert_eq!(texts(store.list()), vec!["Buy milk", "Call bank"]);

    store.complete(0).unwrap();

    assert_eq!(texts(store.list_by_status(true)), vec!["Buy milk"]);
    assert_eq!(texts(store.list_by_status(false)), vec!["Call bank"]);
}

#[test]
fn out_of_range_delete_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_in(&dir);
    store.create("keep me", None, None).unwrap();
    let bytes_before = fs::read(&path).unwrap();

    for index in [store.len(), usize::MAX] {
        let err = store.delete(index).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { len: 1, .. }));
    }

    assert_eq!(store.len(), 1);
    assert_eq!(fs::read(&path).unwrap(), bytes_before);
}

#[test]
fn failed_save_rolls_back_in_memory_change() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();
    let mut store = TaskStore::open(blocker.join("tasks.json"));

    let err = store.create("never stored", None, None).unwrap_err();

    assert!(matches!(err, StoreError::Repo(_)));
    assert!(store.is_empty());
}

#[test]
fn legacy_file_without_ids_loads_and_gains_ids_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
            {"task": "Acheter du pain", "completed": false, "deadline": "", "priority": "Moyenne"},
            {"task": "Ranger", "completed": false, "deadline": "2025-01-10", "priority": ""}
        ]"#,
    )
    .unwrap();

    let mut store = TaskStore::open(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().priority, "Moyenne");
    assert_eq!(store.get(0).unwrap().deadline, None);
    assert_eq!(store.get(1).unwrap().priority, "Medium");
    assert_eq!(store.get(1).unwrap().deadline.as_deref(), Some("2025-01-10"));
    let id = store.get(0).unwrap().id;

    store.complete(0).unwrap();
    let reopened = TaskStore::open(&path);
    assert_eq!(reopened.get(0).unwrap().id, id);
    assert!(reopened.get(0).unwrap().completed);
}

#[test]
fn corrupt_file_opens_empty_and_reload_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = TaskStore::open(&path);
    assert!(store.is_empty());
    assert!(matches!(store.reload().unwrap_err(), StoreError::Repo(_)));
}

#[test]
fn reload_picks_up_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let (mut first, path) = store_in(&dir);
    first.create("mine", None, None).unwrap();

    let mut second = TaskStore::open(&path);
    second.create("theirs", None, None).unwrap();

    first.reload().unwrap();
    assert_eq!(texts(first.list()), vec!["mine", "theirs"]);
}

#[test]
fn saved_file_uses_flat_list_wire_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_in(&dir);
    store
        .create("Buy milk", Some("2025-01-10".to_string()), Some("High".to_string()))
        .unwrap();
    store.create("Call bank", None, None).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["task"], "Buy milk");
    assert_eq!(items[0]["completed"], false);
    assert_eq!(items[0]["deadline"], "2025-01-10");
    assert_eq!(items[0]["priority"], "High");
    assert!(items[1]["deadline"].is_null());
    assert_eq!(items[1]["priority"], "Medium");
    assert!(items[1]["id"].is_string());
}
