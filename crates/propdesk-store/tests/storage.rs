//! Integration tests for `Storage` over both backends.
//!
//! Every property is checked against `MemoryStore` and `FileStore` so the
//! two backends can't drift apart.

use std::collections::BTreeMap;

use propdesk_store::{FileStore, KeyValueStore, MemoryStore, Storage, keys};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    id: String,
    name: String,
    tags: Vec<String>,
    score: Option<f64>,
    meta: BTreeMap<String, i64>,
}

fn sample_profile() -> Profile {
    Profile {
        id: "1".into(),
        name: "A \"quoted\" name / ünïcode".into(),
        tags: vec!["owner".into(), "admin".into()],
        score: Some(4.5),
        meta: BTreeMap::from([("plots".into(), 3), ("rooms".into(), 12)]),
    }
}

async fn check_object_round_trip<S: KeyValueStore>(storage: Storage<S>) {
    let profile = sample_profile();
    storage.set_object(keys::USER_DATA, &profile).await.unwrap();
    let back: Option<Profile> = storage.get_object(keys::USER_DATA).await;
    assert_eq!(back, Some(profile));

    let empty = Profile {
        id: String::new(),
        name: String::new(),
        tags: vec![],
        score: None,
        meta: BTreeMap::new(),
    };
    storage.set_object("empty", &empty).await.unwrap();
    assert_eq!(storage.get_object::<Profile>("empty").await, Some(empty));

    storage.set_object("list", &vec![1u8, 2, 3]).await.unwrap();
    assert_eq!(storage.get_object::<Vec<u8>>("list").await, Some(vec![1, 2, 3]));
}

async fn check_remove_twice<S: KeyValueStore>(storage: Storage<S>) {
    storage.set_item(keys::AUTH_TOKEN, "tok123").await.unwrap();

    storage.remove_item(keys::AUTH_TOKEN).await.unwrap();
    assert_eq!(storage.get_item(keys::AUTH_TOKEN).await, None);

    storage.remove_item(keys::AUTH_TOKEN).await.unwrap();
    assert_eq!(storage.get_item(keys::AUTH_TOKEN).await, None);
}

async fn check_clear<S: KeyValueStore>(storage: Storage<S>) {
    storage.set_item(keys::AUTH_TOKEN, "t").await.unwrap();
    storage.set_item(keys::USER_DATA, "{}").await.unwrap();

    storage.clear().await.unwrap();

    assert_eq!(storage.get_item(keys::AUTH_TOKEN).await, None);
    assert_eq!(storage.get_item(keys::USER_DATA).await, None);
}

#[tokio::test]
async fn test_memory_store_object_round_trip() {
    check_object_round_trip(Storage::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn test_file_store_object_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    check_object_round_trip(Storage::new(FileStore::new(dir.path().join("kv.json")))).await;
}

#[tokio::test]
async fn test_memory_store_remove_twice_stays_absent() {
    check_remove_twice(Storage::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn test_file_store_remove_twice_stays_absent() {
    let dir = tempfile::tempdir().unwrap();
    check_remove_twice(Storage::new(FileStore::new(dir.path().join("kv.json")))).await;
}

#[tokio::test]
async fn test_memory_store_clear_removes_everything() {
    check_clear(Storage::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn test_file_store_clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    check_clear(Storage::new(FileStore::new(dir.path().join("kv.json")))).await;
}

#[tokio::test]
async fn test_file_store_corrupt_file_degrades_reads_but_fails_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.json");
    std::fs::write(&path, b"{ broken").unwrap();
    let storage = Storage::new(FileStore::new(&path));

    assert_eq!(storage.get_item(keys::AUTH_TOKEN).await, None);
    assert!(storage.set_item(keys::AUTH_TOKEN, "t").await.is_err());
}
