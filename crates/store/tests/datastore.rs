//! Secret store behaviour against an in-memory SQLite database

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use store::entities::secret::{Column, Entity};
use store::{
    CreateOptions, DataStore, DeleteOptions, Factory, GetOptions, ListOptions, Secret,
    SecretStore, StoreError, UpdateOptions,
};

async fn test_store() -> DataStore {
    DataStore::connect("sqlite::memory:", 1).await.unwrap()
}

fn secret(username: &str, name: &str) -> Secret {
    let mut secret = Secret {
        username: username.to_string(),
        secret_id: format!("{name}-id"),
        secret_key: format!("{name}-key"),
        description: format!("secret {name}"),
        ..Secret::default()
    };
    secret.metadata.name = name.to_string();
    secret
}

async fn seed(secrets: &dyn SecretStore, username: &str, names: &[&str]) {
    for name in names {
        secrets
            .create(secret(username, name), CreateOptions::default())
            .await
            .unwrap();
    }
}

/// Count rows directly, soft-deleted ones included
async fn stored_rows(store: &DataStore, username: &str, name: &str) -> usize {
    Entity::find()
        .filter(Column::Username.eq(username))
        .filter(Column::Name.eq(name))
        .all(store.connection())
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn test_create_assigns_identity_and_timestamps() {
    let store = test_store().await;
    let secrets = store.secrets();

    let created = secrets
        .create(secret("alice", "ci-token"), CreateOptions::default())
        .await
        .unwrap();

    assert!(created.metadata.id > 0);
    assert!(created.metadata.instance_id.starts_with("secret-"));
    assert_eq!(created.metadata.instance_id.len(), "secret-".len() + 8);
    assert!(created.metadata.created_at.is_some());
    assert_eq!(created.username, "alice");

    let fetched = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_is_scoped_to_owner() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["shared-name"]).await;

    let err = secrets
        .get("bob", "shared-name", GetOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "record not found");
}

#[tokio::test]
async fn test_soft_delete_hides_row_but_keeps_it() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["ci-token"]).await;

    secrets
        .delete("alice", "ci-token", DeleteOptions { unscoped: false })
        .await
        .unwrap();

    let err = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
    assert_eq!(stored_rows(&store, "alice", "ci-token").await, 1);

    let list = secrets
        .list("alice", ListOptions::unbounded())
        .await
        .unwrap();
    assert_eq!(list.total_count, 0);
}

#[tokio::test]
async fn test_unscoped_delete_removes_row() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["ci-token"]).await;

    secrets
        .delete("alice", "ci-token", DeleteOptions { unscoped: true })
        .await
        .unwrap();

    assert_eq!(stored_rows(&store, "alice", "ci-token").await, 0);
}

#[tokio::test]
async fn test_unscoped_delete_purges_soft_deleted_row() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["ci-token"]).await;

    secrets
        .delete("alice", "ci-token", DeleteOptions::default())
        .await
        .unwrap();
    secrets
        .delete("alice", "ci-token", DeleteOptions { unscoped: true })
        .await
        .unwrap();

    assert_eq!(stored_rows(&store, "alice", "ci-token").await, 0);
}

#[tokio::test]
async fn test_unscoped_does_not_leak_into_later_calls() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["first", "second"]).await;

    secrets
        .delete("alice", "first", DeleteOptions { unscoped: true })
        .await
        .unwrap();
    secrets
        .delete("alice", "second", DeleteOptions::default())
        .await
        .unwrap();

    assert_eq!(stored_rows(&store, "alice", "first").await, 0);
    assert_eq!(stored_rows(&store, "alice", "second").await, 1);
}

#[tokio::test]
async fn test_delete_collection() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["a", "b", "c"]).await;
    seed(secrets.as_ref(), "bob", &["a"]).await;

    secrets
        .delete_collection(
            "alice",
            &["a".to_string(), "b".to_string()],
            DeleteOptions::default(),
        )
        .await
        .unwrap();

    let alice = secrets
        .list("alice", ListOptions::unbounded())
        .await
        .unwrap();
    assert_eq!(alice.total_count, 1);
    assert_eq!(alice.items[0].metadata.name, "c");
    assert_eq!(stored_rows(&store, "alice", "a").await, 1);

    // Other owners are untouched
    secrets
        .get("bob", "a", GetOptions::default())
        .await
        .unwrap();

    secrets
        .delete_collection(
            "alice",
            &["a".to_string(), "b".to_string()],
            DeleteOptions { unscoped: true },
        )
        .await
        .unwrap();
    assert_eq!(stored_rows(&store, "alice", "a").await, 0);
    assert_eq!(stored_rows(&store, "alice", "b").await, 0);
}

#[tokio::test]
async fn test_delete_collection_with_no_names_is_a_no_op() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["a"]).await;

    secrets
        .delete_collection("alice", &[], DeleteOptions { unscoped: true })
        .await
        .unwrap();

    assert_eq!(stored_rows(&store, "alice", "a").await, 1);
}

#[tokio::test]
async fn test_update_overwrites_row() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["ci-token"]).await;

    let mut existing = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap();
    existing.description = "rotated".to_string();
    existing.expires = 1_900_000_000;
    existing
        .metadata
        .extend
        .insert("rotated".to_string(), serde_json::json!(true));

    let updated = secrets
        .update(existing.clone(), UpdateOptions::default())
        .await
        .unwrap();
    assert_eq!(updated.metadata.id, existing.metadata.id);
    assert_eq!(updated.metadata.created_at, existing.metadata.created_at);

    let fetched = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap();
    assert_eq!(fetched.description, "rotated");
    assert_eq!(fetched.expires, 1_900_000_000);
    assert_eq!(fetched.metadata.extend["rotated"], true);
    assert_eq!(fetched.metadata.instance_id, existing.metadata.instance_id);
}

#[tokio::test]
async fn test_update_of_missing_row_is_not_found() {
    let store = test_store().await;
    let secrets = store.secrets();

    let mut ghost = secret("alice", "ghost");
    ghost.metadata.id = 4242;

    let err = secrets
        .update(ghost, UpdateOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_does_not_revive_soft_deleted_row() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["ci-token"]).await;

    let mut existing = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap();
    secrets
        .delete("alice", "ci-token", DeleteOptions::default())
        .await
        .unwrap();

    existing.description = "rotated".to_string();
    let err = secrets
        .update(existing, UpdateOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = secrets
        .get("alice", "ci-token", GetOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unbounded_list_counts_every_live_row() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["s1", "s2", "s3", "s4"]).await;

    let list = secrets
        .list("alice", ListOptions::unbounded())
        .await
        .unwrap();
    assert_eq!(list.total_count, 4);
    assert_eq!(list.items.len(), 4);
}

#[tokio::test]
async fn test_list_with_offset_and_no_limit() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["s1", "s2", "s3", "s4"]).await;

    let page = secrets
        .list(
            "alice",
            ListOptions {
                offset: Some(2),
                limit: None,
                ..ListOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total_count, 4);
    let names: Vec<_> = page.items.iter().map(|s| s.metadata.name.as_str()).collect();
    assert_eq!(names, vec!["s2", "s1"]);
}

#[tokio::test]
async fn test_list_filters_by_name_substring() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["foo", "foobar", "barfoo", "baz"]).await;

    let list = secrets
        .list(
            "alice",
            ListOptions {
                field_selector: "name=foo".to_string(),
                ..ListOptions::default()
            },
        )
        .await
        .unwrap();

    let mut names: Vec<_> = list.items.iter().map(|s| s.metadata.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["barfoo", "foo", "foobar"]);
    assert_eq!(list.total_count, 3);
}

#[tokio::test]
async fn test_list_ignores_non_exact_and_invalid_selectors() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["foo", "baz"]).await;

    for selector in ["name!=foo", "description=foo", "not a selector"] {
        let list = secrets
            .list(
                "alice",
                ListOptions {
                    field_selector: selector.to_string(),
                    ..ListOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(list.total_count, 2, "selector {selector:?}");
    }
}

#[tokio::test]
async fn test_list_paginates_newest_first_and_counts_everything() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["s1", "s2", "s3", "s4", "s5"]).await;

    let page = secrets
        .list(
            "alice",
            ListOptions {
                offset: Some(1),
                limit: Some(2),
                ..ListOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total_count, 5);
    let names: Vec<_> = page.items.iter().map(|s| s.metadata.name.as_str()).collect();
    assert_eq!(names, vec!["s4", "s3"]);
}

#[tokio::test]
async fn test_list_with_empty_owner_spans_all_owners() {
    let store = test_store().await;
    let secrets = store.secrets();
    seed(secrets.as_ref(), "alice", &["a1", "a2"]).await;
    seed(secrets.as_ref(), "bob", &["b1"]).await;

    let all = secrets.list("", ListOptions::unbounded()).await.unwrap();
    assert_eq!(all.total_count, 3);
    assert_eq!(all.items.len(), 3);

    let bob = secrets.list("bob", ListOptions::unbounded()).await.unwrap();
    assert_eq!(bob.total_count, 1);
    assert_eq!(bob.items[0].username, "bob");
}

#[tokio::test]
async fn test_stores_share_one_connection() {
    let store = test_store().await;
    seed(store.secrets().as_ref(), "alice", &["a"]).await;

    // A second handle sees rows written through the first
    let other = store.secrets();
    other.get("alice", "a", GetOptions::default()).await.unwrap();

    store.close().await.unwrap();
}
