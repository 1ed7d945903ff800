use serde_json::json;
use session_store::{
    export_document, keys, select_window, FileKvStore, KeyValueStore, MemoryKvStore, Role, Session,
    SessionStore, DEFAULT_SESSION_TITLE,
};
use tempfile::TempDir;

fn memory_store() -> SessionStore {
    SessionStore::new(Box::new(MemoryKvStore::new()))
}

fn file_store() -> (TempDir, SessionStore) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let kv = FileKvStore::open(dir.path()).expect("file store should open");
    (dir, SessionStore::new(Box::new(kv)))
}

fn seeded_store(raw_sessions: &str) -> SessionStore {
    let mut kv = MemoryKvStore::new();
    kv.set_string(keys::SESSIONS, raw_sessions)
        .expect("seed value should be written");
    SessionStore::new(Box::new(kv))
}

/// Session id, title, and message texts: the id-stable projection used to
/// compare collections across ports.
fn summarize(sessions: &[Session]) -> Vec<(String, String, Vec<String>)> {
    sessions
        .iter()
        .map(|session| {
            (
                session.id.clone(),
                session.title.clone(),
                session
                    .messages
                    .iter()
                    .map(|message| message.text.clone())
                    .collect(),
            )
        })
        .collect()
}

fn exercise(store: &mut SessionStore) -> Vec<Session> {
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");
    store
        .add_message("s-a", Role::User, "hello", Some(3_000))
        .expect("add_message should succeed")
        .expect("session s-a should exist");
    store.load_all()
}

#[test]
fn load_all_is_empty_when_nothing_was_persisted() {
    let store = memory_store();
    assert!(store.load_all().is_empty());
}

#[test]
fn load_all_degrades_malformed_collection_to_empty() {
    let store = seeded_store("{ definitely not a json array");
    assert!(store.load_all().is_empty());
}

#[test]
fn load_all_tolerates_partial_records() {
    let store = seeded_store(
        &json!([
            { "id": "s-1", "messages": [{ "role": "tool", "ts": 9 }] },
            { "title": "no id" },
        ])
        .to_string(),
    );

    let sessions = store.load_all();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, "s-1");
    assert_eq!(sessions[0].messages[0].role, Role::User);
    assert_eq!(sessions[0].messages[0].text, "");
    assert_eq!(sessions[1].id, "");
}

#[test]
fn ensure_shape_is_idempotent_and_fills_missing_fields() {
    let store = memory_store();
    let candidate = Session {
        id: String::new(),
        title: String::new(),
        created_at: 0,
        updated_at: 0,
        messages: Vec::new(),
    };

    let once = store.ensure_shape(candidate);
    let twice = store.ensure_shape(once.clone());

    assert_eq!(once, twice);
    assert!(!once.id.is_empty());
    assert_eq!(once.title, DEFAULT_SESSION_TITLE);
    assert!(once.created_at > 0);
    assert!(once.updated_at >= once.created_at);
}

#[test]
fn upsert_then_get_by_id_round_trips_the_normalized_session() {
    let mut store = memory_store();
    let stored = store
        .upsert_session(Session::new("s-1", "First", 1_000))
        .expect("upsert should succeed");

    let loaded = store.get_by_id("s-1").expect("session should be present");
    assert_eq!(loaded, stored);
}

#[test]
fn upsert_prepends_new_sessions_most_recent_first() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");

    let ids: Vec<String> = store
        .load_all()
        .into_iter()
        .map(|session| session.id)
        .collect();
    assert_eq!(ids, vec!["s-b".to_string(), "s-a".to_string()]);
}

#[test]
fn upsert_replaces_in_place_without_reordering() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");

    store
        .upsert_session(Session::new("s-a", "Renamed", 1_000))
        .expect("re-upsert s-a should succeed");

    let sessions = store.load_all();
    assert_eq!(sessions[0].id, "s-b");
    assert_eq!(sessions[1].id, "s-a");
    assert_eq!(sessions[1].title, "Renamed");
}

#[test]
fn rename_truncates_a_200_character_title_to_80() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-1", "First", 1_000))
        .expect("upsert should succeed");

    let renamed = store
        .rename("s-1", &"x".repeat(200))
        .expect("rename should succeed")
        .expect("session should exist");

    assert_eq!(renamed.title.chars().count(), 80);
    assert!(renamed.updated_at >= renamed.created_at);
}

#[test]
fn rename_unknown_id_is_a_signaled_no_op() {
    let mut store = memory_store();
    let renamed = store.rename("missing", "title").expect("rename should not error");
    assert!(renamed.is_none());
}

#[test]
fn add_message_appends_in_order_and_bumps_updated_at() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-1", "First", 1_000))
        .expect("upsert should succeed");

    store
        .add_message("s-1", Role::User, "question", Some(2_000))
        .expect("first add should succeed")
        .expect("session should exist");
    let session = store
        .add_message("s-1", Role::Assistant, "answer", Some(3_000))
        .expect("second add should succeed")
        .expect("session should exist");

    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].text, "question");
    assert_eq!(session.messages[0].role, Role::User);
    assert_eq!(session.messages[1].text, "answer");
    assert_eq!(session.messages[1].role, Role::Assistant);
    assert!(session.updated_at >= session.created_at);
    assert!(!session.messages[0].id.is_empty());
}

#[test]
fn add_message_to_unknown_session_is_a_signaled_no_op() {
    let mut store = memory_store();
    let result = store
        .add_message("missing", Role::User, "hello", None)
        .expect("add_message should not error");
    assert!(result.is_none());
    assert!(store.load_all().is_empty());
}

#[test]
fn delete_one_repoints_the_active_session_to_the_new_first() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");
    store.set_active("s-b").expect("set_active should succeed");

    store.delete_one("s-b").expect("delete should succeed");

    assert_eq!(store.active_session_id().as_deref(), Some("s-a"));
    assert_eq!(store.load_all().len(), 1);
}

#[test]
fn delete_one_clears_the_pointer_when_no_sessions_remain() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "Only", 1_000))
        .expect("upsert should succeed");
    store.set_active("s-a").expect("set_active should succeed");

    store.delete_one("s-a").expect("delete should succeed");

    assert!(store.active_session_id().is_none());
    assert!(store.load_all().is_empty());
}

#[test]
fn delete_one_leaves_a_foreign_active_pointer_alone() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");
    store.set_active("s-a").expect("set_active should succeed");

    store.delete_one("s-b").expect("delete should succeed");

    assert_eq!(store.active_session_id().as_deref(), Some("s-a"));
}

#[test]
fn delete_all_then_ensure_leaves_exactly_one_active_session() {
    let mut store = memory_store();
    exercise(&mut store);
    store.set_active("s-a").expect("set_active should succeed");

    store
        .delete_all_sessions()
        .expect("delete_all should succeed");
    assert!(store.load_all().is_empty());
    assert!(store.active_session_id().is_none());

    let session = store
        .ensure_at_least_one_session()
        .expect("self-heal should succeed");

    let sessions = store.load_all();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, session.id);
    assert_eq!(sessions[0].title, DEFAULT_SESSION_TITLE);
    assert_eq!(store.active_session_id(), Some(session.id));
}

#[test]
fn ensure_repoints_a_dangling_active_pointer() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert should succeed");
    store
        .set_active("deleted-long-ago")
        .expect("set_active should succeed");

    let session = store
        .ensure_at_least_one_session()
        .expect("self-heal should succeed");

    assert_eq!(session.id, "s-a");
    assert_eq!(store.active_session_id().as_deref(), Some("s-a"));
}

#[test]
fn ensure_keeps_a_valid_active_pointer() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-a", "First", 1_000))
        .expect("upsert s-a should succeed");
    store
        .upsert_session(Session::new("s-b", "Second", 2_000))
        .expect("upsert s-b should succeed");
    store.set_active("s-a").expect("set_active should succeed");

    let session = store
        .ensure_at_least_one_session()
        .expect("self-heal should succeed");

    assert_eq!(session.id, "s-a");
    assert_eq!(store.active_session_id().as_deref(), Some("s-a"));
}

#[test]
fn file_and_memory_ports_observe_the_same_behavior() {
    let mut memory = memory_store();
    let (_dir, mut file) = file_store();

    let from_memory = exercise(&mut memory);
    let from_file = exercise(&mut file);

    assert_eq!(summarize(&from_memory), summarize(&from_file));
}

#[test]
fn file_port_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    {
        let kv = FileKvStore::open(dir.path()).expect("file store should open");
        let mut store = SessionStore::new(Box::new(kv));
        store
            .upsert_session(Session::new("s-1", "Durable", 1_000))
            .expect("upsert should succeed");
        store.set_active("s-1").expect("set_active should succeed");
    }

    let kv = FileKvStore::open(dir.path()).expect("file store should reopen");
    let store = SessionStore::new(Box::new(kv));
    assert_eq!(store.load_all().len(), 1);
    assert_eq!(store.active_session_id().as_deref(), Some("s-1"));
}

#[test]
fn window_selection_over_a_stored_session() {
    let mut store = memory_store();
    store
        .upsert_session(Session::new("s-1", "First", 1_000))
        .expect("upsert should succeed");
    for index in 0..30 {
        store
            .add_message("s-1", Role::User, &format!("m{index}"), Some(2_000 + index))
            .expect("add should succeed")
            .expect("session should exist");
    }

    let session = store.get_by_id("s-1").expect("session should be present");
    let window = select_window(&session, 20);

    assert_eq!(window.len(), 20);
    assert_eq!(window[0].text, "m10");
    assert_eq!(window[19].text, "m29");
}

#[test]
fn export_document_carries_app_stamp_and_session() {
    let mut store = memory_store();
    let session = store
        .upsert_session(Session::new("s-1", "First", 1_000))
        .expect("upsert should succeed");

    let document = export_document(&session).expect("export should succeed");
    let value = serde_json::to_value(&document).expect("export should serialize");

    assert_eq!(value["app"], json!("palaver"));
    assert!(value["exportedAt"].is_string());
    assert_eq!(value["session"]["id"], json!("s-1"));
    assert_eq!(value["session"]["createdAt"], json!(1_000));
}
