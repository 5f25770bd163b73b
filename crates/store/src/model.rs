//! Domain records and option structs for the secret resource
//!
//! These are the only types that cross the store boundary. The JSON shape
//! follows the IAM v1 API: object metadata is nested under `metadata` and
//! field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel for "no limit" on list offsets and limits
pub const NO_LIMIT: i64 = -1;

/// Standard object metadata shared by IAM resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Row identifier, assigned by the store
    #[serde(default)]
    pub id: i32,
    /// Public instance identifier, assigned by the store after insert
    #[serde(rename = "instanceID", default)]
    pub instance_id: String,
    #[serde(default)]
    pub name: String,
    /// Free-form attributes, persisted as serialized JSON
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extend: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named credential owned by a single user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Owning principal. Server-assigned on create.
    #[serde(default)]
    pub username: String,
    #[serde(rename = "secretID", default)]
    pub secret_id: String,
    #[serde(default)]
    pub secret_key: String,
    /// Expiry as unix seconds, 0 means never
    #[serde(default)]
    pub expires: i64,
    #[serde(default)]
    pub description: String,
}

impl Secret {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// A page of secrets plus the size of the whole filtered set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretList {
    pub total_count: u64,
    pub items: Vec<Secret>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOptions {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptions {
    /// Remove the row permanently instead of marking it deleted
    #[serde(default)]
    pub unscoped: bool,
}

/// Filtering and pagination for list calls
///
/// `offset` and `limit` of `None` or any negative value mean "no limit".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(default)]
    pub field_selector: String,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListOptions {
    /// Options selecting every row, used to count an owner's secrets
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            field_selector: String::new(),
            offset: Some(0),
            limit: Some(NO_LIMIT),
        }
    }

    /// Offset and limit as the query builder expects them
    #[must_use]
    pub fn window(&self) -> (Option<u64>, Option<u64>) {
        (non_negative(self.offset), non_negative(self.limit))
    }
}

fn non_negative(value: Option<i64>) -> Option<u64> {
    value.and_then(|v| u64::try_from(v).ok())
}
