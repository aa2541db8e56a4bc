use guestbook_kv::store::errors::ListError;
use guestbook_kv::{KeyPart, KvKey, KvStore};
use guestbook_kv_memory_store::InMemoryKvStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    title: String,
    stars: u8,
}

fn store() -> KvStore {
    KvStore::new(InMemoryKvStore::new())
}

#[tokio::test]
async fn typed_values_survive_a_set_and_list() {
    let store = store();
    let note = Note {
        title: "Hello".into(),
        stars: 3,
    };
    store.set(&KvKey::new("notes", 1i64), &note).await.unwrap();

    let entries = store.list::<Note>("notes").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key.part(), &KeyPart::Int(1));
    assert_eq!(entries[0].value, note);
}

#[tokio::test]
async fn clones_share_the_same_backend() {
    let store = store();
    let clone = store.clone();
    clone.set(&KvKey::new("notes", "a"), "first").await.unwrap();

    let entries = store.list::<String>("notes").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, "first");
}

#[tokio::test]
async fn a_value_of_the_wrong_shape_is_a_deserialization_error() {
    let store = store();
    store.set(&KvKey::new("notes", 1i64), "not a note").await.unwrap();

    let err = store.list::<Note>("notes").await.unwrap_err();
    assert!(matches!(err, ListError::Deserialization(_)));
}

#[tokio::test]
async fn listing_an_empty_namespace_returns_nothing() {
    let store = store();
    store.set(&KvKey::new("notes", 1i64), "x").await.unwrap();

    let entries = store.list::<String>("other").await.unwrap();
    assert!(entries.is_empty());
}
