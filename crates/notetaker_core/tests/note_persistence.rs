use notetaker_core::db::open_db;
use notetaker_core::{
    KeyValueStore, MemoryKeyValueStore, Note, NotePersistence, NoteStore, PersistError,
    RepoError, RepoResult, SqliteKeyValueStore, NOTES_STORAGE_KEY,
};
use uuid::Uuid;

/// Store whose writes always fail, for best-effort save checks.
#[derive(Default)]
struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, _value: &[u8]) -> RepoResult<()> {
        Err(RepoError::InvalidKey(key.to_string()))
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        self.inner.remove(key)
    }
}

fn sample_notes() -> Vec<Note> {
    vec![
        Note::new("groceries", "eggs, milk"),
        Note::new("todo", "ship it"),
        Note::new("quote", "To Be Or Not To Be"),
    ]
}

#[test]
fn load_without_prior_save_is_empty() {
    let persistence = NotePersistence::new(MemoryKeyValueStore::new());
    assert!(persistence.load().is_empty());
    assert!(persistence.try_load().unwrap().is_none());
}

#[test]
fn save_then_load_preserves_ids_fields_and_order() {
    let notes = sample_notes();
    let mut persistence = NotePersistence::new(MemoryKeyValueStore::new());

    assert!(persistence.save(&notes));
    assert_eq!(persistence.load(), notes);
}

#[test]
fn save_overwrites_previous_value() {
    let notes = sample_notes();
    let mut persistence = NotePersistence::new(MemoryKeyValueStore::new());
    persistence.save(&notes);
    persistence.save(&notes[..1]);

    assert_eq!(persistence.load(), notes[..1].to_vec());
}

#[test]
fn stored_value_uses_three_field_records() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut persistence = NotePersistence::new(MemoryKeyValueStore::new());
    persistence.save(&[Note::with_id(id, "Note 1", "That Is The Question!")]);

    let bytes = persistence.store().get(NOTES_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Note 1",
            "content": "That Is The Question!"
        }])
    );
}

#[test]
fn decode_failure_is_reported_strictly_and_swallowed_leniently() {
    let mut kv = MemoryKeyValueStore::new();
    kv.put(NOTES_STORAGE_KEY, br#"[{"id":"x","title":1}]"#).unwrap();
    let persistence = NotePersistence::new(kv);

    assert!(matches!(persistence.try_load(), Err(PersistError::Decode(_))));
    assert!(persistence.load().is_empty());
}

#[test]
fn write_failure_keeps_in_memory_state() {
    let mut store = NoteStore::open(ReadOnlyStore::default());
    let id = store.add().id;
    store.edit(id, "kept", "in memory").unwrap();

    assert_eq!(store.notes(), &[Note::with_id(id, "kept", "in memory")]);

    let restarted = NoteStore::open(store.into_persistence().into_store());
    assert!(restarted.is_empty());
}

#[test]
fn sqlite_store_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    let notes = sample_notes();

    {
        let kv = SqliteKeyValueStore::try_new(open_db(&path).unwrap()).unwrap();
        let mut persistence = NotePersistence::new(kv);
        assert!(persistence.save(&notes));
    }

    let kv = SqliteKeyValueStore::try_new(open_db(&path).unwrap()).unwrap();
    assert_eq!(NotePersistence::new(kv).load(), notes);
}

#[test]
fn sqlite_store_put_get_remove() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("kv.db")).unwrap();
    let mut kv = SqliteKeyValueStore::try_new(conn).unwrap();

    assert_eq!(kv.get("notes").unwrap(), None);
    kv.put("notes", b"[]").unwrap();
    kv.put("notes", b"[1]").unwrap();
    assert_eq!(kv.get("notes").unwrap().as_deref(), Some(&b"[1]"[..]));
    assert!(kv.remove("notes").unwrap());
    assert_eq!(kv.get("notes").unwrap(), None);
    assert!(matches!(kv.get(""), Err(RepoError::InvalidKey(_))));
}

#[test]
fn sqlite_store_rejects_connection_without_kv_table() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(matches!(SqliteKeyValueStore::try_new(conn), Err(RepoError::Sqlite(_))));
}
