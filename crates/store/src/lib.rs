//! Data-access layer for the IAM API server
//!
//! Provides the secret resource's persistence:
//! - Domain records and option structs (`model`)
//! - Kubernetes-style field selectors (`fields`)
//! - SeaORM entities (`entities`)
//! - The store traits and the database-backed implementation (`datastore`)
//!
//! Callers only see domain records and option structs. The connection handle
//! stays inside [`DataStore`].

pub mod datastore;
pub mod entities;
pub mod error;
pub mod fields;
pub mod model;
pub mod store_trait;

// Re-export for convenience
pub use datastore::{is_in_memory, DataStore};
pub use error::{Result, StoreError};
pub use model::{
    CreateOptions, DeleteOptions, GetOptions, ListOptions, ObjectMeta, Secret, SecretList,
    UpdateOptions, NO_LIMIT,
};
pub use sea_orm::DbErr;
pub use store_trait::{Factory, SecretStore};
