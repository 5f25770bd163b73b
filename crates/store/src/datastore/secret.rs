//! Secret store backed by the `secret` table

use crate::entities::secret::{ActiveModel, Column, Entity, Model};
use crate::error::{Result, StoreError};
use crate::fields;
use crate::model::{
    CreateOptions, DeleteOptions, GetOptions, ListOptions, ObjectMeta, Secret, SecretList,
    UpdateOptions,
};
use crate::store_trait::SecretStore;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const INSTANCE_ID_PREFIX: &str = "secret-";

/// Explicit "no limit", for backends that reject an OFFSET without a LIMIT
const UNBOUNDED_LIMIT: u64 = i64::MAX.unsigned_abs();

/// Secret store
///
/// Holds a clone of the shared connection. Every call builds its query from
/// scratch, so options such as `unscoped` never carry over to later calls.
#[derive(Clone, Debug)]
pub struct Secrets {
    db: DatabaseConnection,
}

impl Secrets {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rows that have not been soft-deleted
    fn live() -> Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    /// Soft or hard delete every row matching `condition`
    async fn remove(&self, condition: Condition, opts: DeleteOptions) -> Result<u64> {
        let rows_affected = if opts.unscoped {
            Entity::delete_many()
                .filter(condition)
                .exec(&self.db)
                .await?
                .rows_affected
        } else {
            Entity::update_many()
                .col_expr(Column::DeletedAt, Expr::value(unix_now()))
                .filter(condition)
                .filter(Column::DeletedAt.is_null())
                .exec(&self.db)
                .await?
                .rows_affected
        };
        Ok(rows_affected)
    }
}

#[async_trait::async_trait]
impl SecretStore for Secrets {
    async fn create(&self, secret: Secret, _opts: CreateOptions) -> Result<Secret> {
        let timestamp = unix_now();
        let mut active = to_active_model(&secret, timestamp, timestamp)?;
        active.id = NotSet;

        // Insert and instance id assignment commit together or not at all
        let txn = self.db.begin().await?;
        let model = insert_with_instance_id(&txn, active).await?;
        txn.commit().await?;

        info!(
            table = "secret",
            operation = "create",
            username = model.username,
            name = model.name,
            id = model.id,
            "Created secret"
        );
        Ok(to_secret(model))
    }

    async fn update(&self, secret: Secret, _opts: UpdateOptions) -> Result<Secret> {
        let id = secret.metadata.id;
        let created_at = secret
            .metadata
            .created_at
            .map_or_else(unix_now, |t| t.timestamp());
        let mut active = to_active_model(&secret, created_at, unix_now())?;
        active.id = NotSet;
        active.deleted_at = NotSet;

        // Soft-deleted rows are not updatable
        let rows_affected = Entity::update_many()
            .set(active)
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?
            .rows_affected;
        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        let model = Self::live()
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        info!(
            table = "secret",
            operation = "update",
            username = model.username,
            name = model.name,
            id = model.id,
            "Updated secret"
        );
        Ok(to_secret(model))
    }

    async fn delete(&self, username: &str, name: &str, opts: DeleteOptions) -> Result<()> {
        let condition = Condition::all()
            .add(Column::Username.eq(username))
            .add(Column::Name.eq(name));
        let rows_affected = self.remove(condition, opts).await?;

        info!(
            table = "secret",
            operation = "delete",
            username,
            name,
            unscoped = opts.unscoped,
            rows_affected,
            "Deleted secret"
        );
        Ok(())
    }

    async fn delete_collection(
        &self,
        username: &str,
        names: &[String],
        opts: DeleteOptions,
    ) -> Result<()> {
        let condition = Condition::all()
            .add(Column::Username.eq(username))
            .add(Column::Name.is_in(names.iter().map(String::as_str)));
        let rows_affected = self.remove(condition, opts).await?;

        info!(
            table = "secret",
            operation = "delete_collection",
            username,
            names = ?names,
            unscoped = opts.unscoped,
            rows_affected,
            "Deleted secrets"
        );
        Ok(())
    }

    async fn get(&self, username: &str, name: &str, _opts: GetOptions) -> Result<Secret> {
        Self::live()
            .filter(Column::Username.eq(username))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(to_secret)
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, username: &str, opts: ListOptions) -> Result<SecretList> {
        let (offset, limit) = paging(opts.window());

        let mut query = Self::live();
        if !username.is_empty() {
            query = query.filter(Column::Username.eq(username));
        }

        // Only an exact-match `name` term is honoured, and it is applied as a substring match
        let name = match fields::parse_selector(&opts.field_selector) {
            Ok(selector) => selector
                .requires_exact_match("name")
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                debug!(selector = opts.field_selector, error = %e, "Ignoring invalid field selector");
                String::new()
            }
        };
        query = query.filter(Column::Name.contains(name.as_str()));

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_secret)
            .collect();

        Ok(SecretList { total_count, items })
    }
}

/// Insert a row, then derive its instance id from the assigned row id
async fn insert_with_instance_id<C>(conn: &C, active: ActiveModel) -> Result<Model>
where
    C: ConnectionTrait,
{
    let model = active.insert(conn).await?;
    if !model.instance_id.is_empty() {
        return Ok(model);
    }
    let id = model.id;
    let mut active: ActiveModel = model.into();
    active.instance_id = Set(instance_id(INSTANCE_ID_PREFIX, id));
    Ok(active.update(conn).await?)
}

/// Offset and limit as emitted in SQL
///
/// A zero offset is dropped. A positive offset without a limit gets an
/// explicit unbounded limit.
fn paging((offset, limit): (Option<u64>, Option<u64>)) -> (Option<u64>, Option<u64>) {
    let offset = offset.filter(|&o| o > 0);
    let limit = match (offset, limit) {
        (Some(_), None) => Some(UNBOUNDED_LIMIT),
        (_, limit) => limit,
    };
    (offset, limit)
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Render `id` as eight base-36 digits after `prefix`
fn instance_id(prefix: &str, id: i32) -> String {
    let mut n = id.unsigned_abs();
    let mut digits = Vec::with_capacity(8);
    loop {
        digits.push(char::from_digit(n % 36, 36).unwrap_or('0'));
        n /= 36;
        if n == 0 {
            break;
        }
    }
    while digits.len() < 8 {
        digits.push('0');
    }
    let encoded: String = digits.into_iter().rev().collect();
    format!("{prefix}{encoded}")
}

fn to_active_model(secret: &Secret, created_at: i64, updated_at: i64) -> Result<ActiveModel> {
    let extend_shadow = serde_json::to_string(&secret.metadata.extend)
        .map_err(|e| StoreError::Database(DbErr::Json(e.to_string())))?;

    Ok(ActiveModel {
        id: Set(secret.metadata.id),
        instance_id: Set(secret.metadata.instance_id.clone()),
        name: Set(secret.metadata.name.clone()),
        username: Set(secret.username.clone()),
        secret_id: Set(secret.secret_id.clone()),
        secret_key: Set(secret.secret_key.clone()),
        expires: Set(secret.expires),
        description: Set(secret.description.clone()),
        extend_shadow: Set(extend_shadow),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        deleted_at: Set(None),
    })
}

fn to_secret(model: Model) -> Secret {
    let extend = if model.extend_shadow.is_empty() {
        Map::new()
    } else {
        serde_json::from_str::<Map<String, Value>>(&model.extend_shadow).unwrap_or_else(|e| {
            warn!(
                table = "secret",
                id = model.id,
                error = %e,
                "Stored extend attributes are not a JSON object, dropping them"
            );
            Map::new()
        })
    };

    Secret {
        metadata: ObjectMeta {
            id: model.id,
            instance_id: model.instance_id,
            name: model.name,
            extend,
            created_at: DateTime::<Utc>::from_timestamp(model.created_at, 0),
            updated_at: DateTime::<Utc>::from_timestamp(model.updated_at, 0),
        },
        username: model.username,
        secret_id: model.secret_id,
        secret_key: model.secret_key,
        expires: model.expires,
        description: model.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paging_never_emits_offset_without_limit() {
        assert_eq!(paging((None, None)), (None, None));
        assert_eq!(paging((Some(0), None)), (None, None));
        assert_eq!(paging((Some(3), None)), (Some(3), Some(UNBOUNDED_LIMIT)));
        assert_eq!(paging((Some(0), Some(5))), (None, Some(5)));
        assert_eq!(paging((Some(2), Some(5))), (Some(2), Some(5)));
    }

    #[tokio::test]
    async fn test_insert_is_undone_with_its_transaction() {
        let store = crate::DataStore::connect("sqlite::memory:", 1).await.unwrap();
        let db = store.connection();

        let mut secret = Secret {
            username: "alice".to_string(),
            ..Secret::default()
        };
        secret.metadata.name = "ci-token".to_string();
        let mut active = to_active_model(&secret, 1, 1).unwrap();
        active.id = NotSet;

        let txn = db.begin().await.unwrap();
        let model = insert_with_instance_id(&txn, active).await.unwrap();
        assert_eq!(model.instance_id, instance_id(INSTANCE_ID_PREFIX, model.id));
        txn.rollback().await.unwrap();

        assert_eq!(Entity::find().count(db).await.unwrap(), 0);
    }

    #[test]
    fn test_instance_id_is_padded_base36() {
        assert_eq!(instance_id("secret-", 0), "secret-00000000");
        assert_eq!(instance_id("secret-", 7), "secret-00000007");
        assert_eq!(instance_id("secret-", 36), "secret-00000010");
        assert_eq!(instance_id("secret-", 1295), "secret-000000zz");
    }

    #[test]
    fn test_model_round_trips_extend_attributes() {
        let mut secret = Secret {
            username: "alice".to_string(),
            secret_id: "sid".to_string(),
            secret_key: "skey".to_string(),
            expires: 42,
            description: "ci".to_string(),
            ..Secret::default()
        };
        secret.metadata.name = "ci-token".to_string();
        secret
            .metadata
            .extend
            .insert("team".to_string(), json!("infra"));

        let active = to_active_model(&secret, 100, 200).unwrap();
        assert_eq!(active.extend_shadow.unwrap(), r#"{"team":"infra"}"#);
        assert_eq!(active.created_at.unwrap(), 100);

        let model = Model {
            id: 3,
            instance_id: "secret-00000003".to_string(),
            name: "ci-token".to_string(),
            username: "alice".to_string(),
            secret_id: "sid".to_string(),
            secret_key: "skey".to_string(),
            expires: 42,
            description: "ci".to_string(),
            extend_shadow: r#"{"team":"infra"}"#.to_string(),
            created_at: 100,
            updated_at: 200,
            deleted_at: None,
        };
        let restored = to_secret(model);
        assert_eq!(restored.metadata.extend["team"], "infra");
        assert_eq!(restored.metadata.created_at.unwrap().timestamp(), 100);
        assert_eq!(restored.metadata.updated_at.unwrap().timestamp(), 200);
        assert_eq!(restored.username, "alice");
    }

    #[test]
    fn test_malformed_extend_is_dropped() {
        let model = Model {
            id: 1,
            instance_id: String::new(),
            name: "n".to_string(),
            username: "u".to_string(),
            secret_id: String::new(),
            secret_key: String::new(),
            expires: 0,
            description: String::new(),
            extend_shadow: "[1,2]".to_string(),
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        };
        assert!(to_secret(model).metadata.extend.is_empty());
    }
}
