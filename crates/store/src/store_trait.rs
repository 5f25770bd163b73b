//! Store traits
//!
//! `Factory` hands out per-resource stores; `SecretStore` is the secret
//! resource's data-access contract. Both are object-safe so the HTTP layer
//! can hold them behind `Arc<dyn _>`.

use crate::error::Result;
use crate::model::{
    CreateOptions, DeleteOptions, GetOptions, ListOptions, Secret, SecretList, UpdateOptions,
};
use std::sync::Arc;

/// Secret persistence, scoped by owning user
///
/// Implementations do not translate errors: whatever the backend reports is
/// returned to the caller unchanged.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Insert one secret and return it as persisted
    async fn create(&self, secret: Secret, opts: CreateOptions) -> Result<Secret>;

    /// Overwrite every column of the live row identified by `secret.metadata.id`
    ///
    /// A missing or soft-deleted row is `StoreError::NotFound`.
    async fn update(&self, secret: Secret, opts: UpdateOptions) -> Result<Secret>;

    /// Delete the secret `(username, name)`; soft unless `opts.unscoped`
    async fn delete(&self, username: &str, name: &str, opts: DeleteOptions) -> Result<()>;

    /// Delete every secret of `username` whose name is in `names`
    async fn delete_collection(
        &self,
        username: &str,
        names: &[String],
        opts: DeleteOptions,
    ) -> Result<()>;

    /// Fetch one live secret
    async fn get(&self, username: &str, name: &str, opts: GetOptions) -> Result<Secret>;

    /// List live secrets; an empty `username` lists every owner
    async fn list(&self, username: &str, opts: ListOptions) -> Result<SecretList>;
}

/// Entry point to the data store
#[async_trait::async_trait]
pub trait Factory: Send + Sync {
    fn secrets(&self) -> Arc<dyn SecretStore>;

    /// Release the underlying connection pool
    async fn close(&self) -> Result<()>;
}
