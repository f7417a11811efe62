use learn_core::model::{EnrolledCourse, LessonKey};
use learn_core::state::CourseState;
use storage::repository::KeyValueStore;
use storage::snapshot;
use storage::sqlite::SqliteStore;

async fn open(name: &str) -> SqliteStore {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteStore::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_kv_get_set_remove() {
    let repo = open("memdb_kv_basic").await;

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("k", b"first").await.unwrap();
    repo.set("k", b"second").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap(), Some(b"second".to_vec()));

    repo.remove("k").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = open("memdb_kv_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
    repo.set("k", b"v").await.unwrap();
    assert!(repo.get("k").await.unwrap().is_some());
}

#[tokio::test]
async fn snapshot_survives_reconnect() {
    let url = "sqlite:file:memdb_kv_snapshot?mode=memory&cache=shared";
    let first = SqliteStore::connect(url).await.expect("connect");
    first.migrate().await.expect("migrate");

    let mut state = CourseState::default();
    state.enrolled.push(EnrolledCourse::titled("A"));
    state.enrolled.push(EnrolledCourse::titled("B"));
    state.lesson_completion.insert(LessonKey::new("A", 2), true);
    snapshot::save(&first, "state", &state).await.unwrap();

    // a second pool on the same shared in-memory database stands in for a restart
    let second = SqliteStore::connect(url).await.expect("reconnect");
    let restored = snapshot::load(&second, "state").await.expect("snapshot");
    assert_eq!(restored, state);
}

#[tokio::test]
async fn corrupt_blob_loads_as_absent() {
    let repo = open("memdb_kv_corrupt").await;
    repo.set("state", b"{\"version\":1,\"courses\":").await.unwrap();
    assert!(snapshot::load(&repo, "state").await.is_none());
}
