//! SeaORM entities
//!
//! One table per IAM resource. Only the secret resource lives here.

pub mod secret;

// Re-export for convenience
pub use secret::Entity as SecretEntity;
