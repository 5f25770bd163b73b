//! Secret listing

use super::query_error;
use crate::api::username;
use crate::observability::observe;
use crate::response::{ApiError, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use store::{ListOptions, SecretList};
use tracing::debug;

/// `GET /v1/secrets?offset=&limit=&fieldSelector=`
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListOptions>, QueryRejection>,
) -> ApiResult<Json<SecretList>> {
    observe("list", async move {
        let Query(opts) = query.map_err(|e| query_error(&e))?;
        let username = username(&headers)?;

        let list = state
            .factory
            .secrets()
            .list(&username, opts)
            .await
            .map_err(|e| ApiError::database(&e))?;

        debug!(username, total_count = list.total_count, "Listed secrets");
        Ok(Json(list))
    })
    .await
}
