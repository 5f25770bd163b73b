//! Secret update

use super::bind_error;
use crate::api::username;
use crate::code::Code;
use crate::observability::observe;
use crate::response::{ApiError, ApiResult};
use crate::server::AppState;
use crate::validation::validate_secret_update;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use store::{GetOptions, Secret, UpdateOptions};
use tracing::info;

/// `PUT /v1/secrets/{name}`
///
/// Only `expires`, `description` and `metadata.extend` are taken from the
/// body. Name, owner and key material stay as stored.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    payload: Result<Json<Secret>, JsonRejection>,
) -> ApiResult<Json<Secret>> {
    observe("update", async move {
        let Json(changes) = payload.map_err(|e| bind_error(&e))?;
        let username = username(&headers)?;
        let secrets = state.factory.secrets();

        let mut secret = secrets
            .get(&username, &name, GetOptions::default())
            .await
            .map_err(|e| ApiError::from_lookup(&e))?;

        secret.expires = changes.expires;
        secret.description = changes.description;
        secret.metadata.extend = changes.metadata.extend;

        if let Some(details) = validate_secret_update(&secret).to_aggregate() {
            return Err(ApiError::with_code(Code::Validation, details));
        }

        let updated = secrets
            .update(secret, UpdateOptions::default())
            .await
            .map_err(|e| ApiError::from_lookup(&e))?;

        info!(username, name, "Secret updated");
        Ok(Json(updated))
    })
    .await
}
