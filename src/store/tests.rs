use super::*;
use serde::Deserialize;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    id: String,
    name: String,
}

#[tokio::test]
async fn memory_store_get_set_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("k", "\"v\"".to_string()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("\"v\""));
    assert_eq!(store.len().await, 1);

    store.remove("k").await.unwrap();
    assert!(store.is_empty().await);
    // removing twice is fine
    store.remove("k").await.unwrap();
}

#[tokio::test]
async fn json_helpers_encode_and_decode() {
    let store = MemoryStore::new();
    let entry = Entry {
        id: "abc".into(),
        name: "Road Trip".into(),
    };
    store.set_json("abc", &entry).await.unwrap();

    let back: Option<Entry> = store.get_json("abc").await.unwrap();
    assert_eq!(back, Some(entry));
    let missing: Option<Entry> = store.get_json("nope").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn get_json_reports_malformed_records() {
    let store = MemoryStore::new();
    store.set("bad", "{not json".to_string()).await.unwrap();
    let err = store.get_json::<Entry>("bad").await.unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let store = JsonFileStore::open(&path).await.unwrap();
        store.set_json("one", &1u32).await.unwrap();
        store.set_json("two", &2u32).await.unwrap();
        store.remove("one").await.unwrap();
    }

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(store.get_json::<u32>("two").await.unwrap(), Some(2));
    assert_eq!(store.get("one").await.unwrap(), None);
    assert_eq!(store.keys().await.unwrap(), vec!["two".to_string()]);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn file_store_opens_missing_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = JsonFileStore::open(&path).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());

    std::fs::write(&path, "  \n").unwrap();
    let store = JsonFileStore::open(&path).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let err = JsonFileStore::open(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}
