//! Secret lookup

use crate::api::username;
use crate::observability::observe;
use crate::response::{ApiError, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use store::{GetOptions, Secret};

/// `GET /v1/secrets/{name}`
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<Secret>> {
    observe("get", async move {
        let username = username(&headers)?;
        let secret = state
            .factory
            .secrets()
            .get(&username, &name, GetOptions::default())
            .await
            .map_err(|e| ApiError::from_lookup(&e))?;
        Ok(Json(secret))
    })
    .await
}
