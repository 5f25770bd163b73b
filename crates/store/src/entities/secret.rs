//! Secret SeaORM entity
//!
//! Table: secret
//! Soft deletion sets `deleted_at`; live rows have it NULL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "secret")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub instance_id: String,
    pub name: String,
    pub username: String,
    pub secret_id: String,
    pub secret_key: String,
    pub expires: i64, // Unix timestamp, 0 = never
    pub description: String,
    /// Serialized `metadata.extend` object
    #[sea_orm(column_type = "Text")]
    pub extend_shadow: String,
    pub created_at: i64, // Unix timestamp
    pub updated_at: i64, // Unix timestamp
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
