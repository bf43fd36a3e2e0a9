//! Behaviour of `CollectionStore` through the `TodoStore` trait.
//!
//! # Design
//! Properties run each case on a fresh current-thread runtime and a fresh
//! store, so cases never observe each other's documents.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::json;
use todo_core::{CollectionStore, ListFilter, ObjectId, Todo, TodoPatch, TodoStore};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn todo_strategy() -> impl Strategy<Value = Todo> {
    ("[a-cA-C ]{1,8}", "[a-cA-C ]{1,8}", "[0-9-]{1,10}", any::<bool>()).prop_map(
        |(title, description, due_date, status)| {
            Todo::new(title, description, due_date, status).unwrap()
        },
    )
}

async fn seed(store: &CollectionStore, todos: &[Todo]) -> Vec<ObjectId> {
    let mut ids = Vec::with_capacity(todos.len());
    for todo in todos {
        ids.push(store.create(todo.clone()).await.unwrap().id);
    }
    ids
}

async fn listed_ids(store: &CollectionStore, filter: &ListFilter) -> BTreeSet<ObjectId> {
    store
        .list(filter)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect()
}

proptest! {
    #[test]
    fn create_then_find_returns_the_same_fields(todo in todo_strategy()) {
        block_on(async {
            let store = CollectionStore::in_memory();
            let created = store.create(todo.clone()).await.unwrap();
            assert_eq!(created.todo, todo);

            let found = store.find_by_id(&created.id).await.unwrap().unwrap();
            assert_eq!(found, created);
        });
    }

    #[test]
    fn unfiltered_list_is_the_whole_collection(todos in prop::collection::vec(todo_strategy(), 0..12)) {
        block_on(async {
            let store = CollectionStore::in_memory();
            let ids: BTreeSet<_> = seed(&store, &todos).await.into_iter().collect();
            assert_eq!(listed_ids(&store, &ListFilter::default()).await, ids);
        });
    }

    #[test]
    fn status_filter_selects_exactly_matching_todos(
        todos in prop::collection::vec(todo_strategy(), 0..12),
        wanted in any::<bool>(),
    ) {
        block_on(async {
            let store = CollectionStore::in_memory();
            let ids = seed(&store, &todos).await;
            let expected: BTreeSet<_> = ids
                .iter()
                .zip(&todos)
                .filter(|(_, t)| t.status() == wanted)
                .map(|(id, _)| *id)
                .collect();

            let raw = wanted.to_string();
            let filter = ListFilter::from_query(Some(&raw), None);
            assert_eq!(listed_ids(&store, &filter).await, expected);
        });
    }

    #[test]
    fn unrecognised_status_is_ignored(
        todos in prop::collection::vec(todo_strategy(), 0..8),
        status in "[a-z]{0,6}",
    ) {
        prop_assume!(status != "true" && status != "false");
        block_on(async {
            let store = CollectionStore::in_memory();
            seed(&store, &todos).await;
            let filtered = listed_ids(&store, &ListFilter::from_query(Some(&status), None)).await;
            let everything = listed_ids(&store, &ListFilter::default()).await;
            assert_eq!(filtered, everything);
        });
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case(
        todos in prop::collection::vec(todo_strategy(), 0..12),
        term in "[a-cA-C]{1,2}",
    ) {
        block_on(async {
            let store = CollectionStore::in_memory();
            let ids = seed(&store, &todos).await;
            let needle = term.to_lowercase();
            let expected: BTreeSet<_> = ids
                .iter()
                .zip(&todos)
                .filter(|(_, t)| {
                    t.title().to_lowercase().contains(&needle)
                        || t.description().to_lowercase().contains(&needle)
                })
                .map(|(id, _)| *id)
                .collect();

            let filter = ListFilter::from_query(None, Some(&term));
            assert_eq!(listed_ids(&store, &filter).await, expected);
        });
    }

    #[test]
    fn status_update_leaves_other_fields_alone(todo in todo_strategy(), status in any::<bool>()) {
        block_on(async {
            let store = CollectionStore::in_memory();
            let created = store.create(todo.clone()).await.unwrap();
            let patch = TodoPatch::validate(&json!({ "status": status })).unwrap();

            let updated = store.update_by_id(&created.id, &patch).await.unwrap().unwrap();
            assert_eq!(updated.id, created.id);
            assert_eq!(updated.todo.status(), status);
            assert_eq!(updated.todo.title(), todo.title());
            assert_eq!(updated.todo.description(), todo.description());
            assert_eq!(updated.todo.due_date(), todo.due_date());

            let stored = store.find_by_id(&created.id).await.unwrap().unwrap();
            assert_eq!(stored, updated);
        });
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let store = CollectionStore::in_memory();
    seed(
        &store,
        &[Todo::new("Buy milk", "2%", "2024-01-01", false).unwrap()],
    )
    .await;
    let missing: ObjectId = "0191e8a2-5c3b-7000-8000-000000000000".parse().unwrap();
    let patch = TodoPatch::validate(&json!({ "status": true })).unwrap();

    assert_eq!(store.find_by_id(&missing).await.unwrap(), None);
    assert_eq!(store.update_by_id(&missing, &patch).await.unwrap(), None);
    assert!(!store.delete_by_id(&missing).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_document_once() {
    let store = CollectionStore::in_memory();
    let ids = seed(
        &store,
        &[
            Todo::new("Buy milk", "2%", "2024-01-01", false).unwrap(),
            Todo::new("Walk dog", "park", "2024-01-02", true).unwrap(),
        ],
    )
    .await;

    assert!(store.delete_by_id(&ids[0]).await.unwrap());
    assert!(!store.delete_by_id(&ids[0]).await.unwrap());
    assert_eq!(store.find_by_id(&ids[0]).await.unwrap(), None);
    assert_eq!(store.collection().count().await, 1);
}

#[tokio::test]
async fn empty_patch_returns_the_current_document() {
    let store = CollectionStore::in_memory();
    let created = store
        .create(Todo::new("Buy milk", "2%", "2024-01-01", false).unwrap())
        .await
        .unwrap();
    let patch = TodoPatch::validate(&json!({})).unwrap();
    let updated = store.update_by_id(&created.id, &patch).await.unwrap();
    assert_eq!(updated, Some(created));
}

#[tokio::test]
async fn list_preserves_creation_order() {
    let store = CollectionStore::in_memory();
    let todos: Vec<Todo> = ["one", "two", "three"]
        .iter()
        .map(|t| Todo::new(*t, "d", "2024-01-01", false).unwrap())
        .collect();
    let ids = seed(&store, &todos).await;
    let listed: Vec<ObjectId> = store
        .list(&ListFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(listed, ids);
}
