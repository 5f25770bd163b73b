//! Secret creation

use super::bind_error;
use crate::api::username;
use crate::code::Code;
use crate::constants::MAX_SECRET_COUNT;
use crate::observability::observe;
use crate::response::{ApiError, ApiResult};
use crate::server::AppState;
use crate::validation::validate_secret;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use store::{CreateOptions, ListOptions, Secret};
use tracing::info;
use uuid::Uuid;

/// `POST /v1/secrets`
///
/// Validates the payload, enforces the per-user quota, then persists the
/// secret under the caller's name. The quota check and the insert are two
/// separate statements, so concurrent creates for one user can overshoot it.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Secret>, JsonRejection>,
) -> ApiResult<Json<Secret>> {
    observe("create", async move {
        let Json(mut secret) = payload.map_err(|e| bind_error(&e))?;

        if let Some(details) = validate_secret(&secret).to_aggregate() {
            return Err(ApiError::with_code(Code::Validation, details));
        }

        let username = username(&headers)?;
        let secrets = state.factory.secrets();

        let existing = secrets
            .list(&username, ListOptions::unbounded())
            .await
            .map_err(|e| ApiError::database(&e))?;
        if existing.total_count >= MAX_SECRET_COUNT {
            return Err(ApiError::with_code(
                Code::ReachMaxCount,
                format!("secret count: {}", existing.total_count),
            ));
        }

        // Ownership and identity always come from the server
        secret.username.clone_from(&username);
        secret.metadata.id = 0;
        secret.metadata.instance_id.clear();
        fill_credentials(&mut secret);

        let created = secrets
            .create(secret, CreateOptions::default())
            .await
            .map_err(|e| ApiError::database(&e))?;

        info!(
            username,
            name = created.metadata.name,
            instance_id = created.metadata.instance_id,
            "Secret created"
        );
        Ok(Json(created))
    })
    .await
}

/// Generate the key pair when the client left it blank
fn fill_credentials(secret: &mut Secret) {
    if secret.secret_id.is_empty() {
        secret.secret_id = Uuid::new_v4().simple().to_string();
    }
    if secret.secret_key.is_empty() {
        secret.secret_key = Uuid::new_v4().simple().to_string();
    }
}
