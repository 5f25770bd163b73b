//! Secret deletion

use super::query_error;
use crate::api::username;
use crate::code::Code;
use crate::observability::observe;
use crate::response::{no_content, ApiError, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use store::DeleteOptions;
use tracing::info;

type Deleted = (StatusCode, Json<Option<()>>);

/// `DELETE /v1/secrets/{name}?unscoped=`
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    query: Result<Query<DeleteOptions>, QueryRejection>,
) -> ApiResult<Deleted> {
    observe("delete", async move {
        let Query(opts) = query.map_err(|e| query_error(&e))?;
        let username = username(&headers)?;

        state
            .factory
            .secrets()
            .delete(&username, &name, opts)
            .await
            .map_err(|e| ApiError::database(&e))?;

        info!(username, name, unscoped = opts.unscoped, "Secret deleted");
        Ok(no_content())
    })
    .await
}

/// `DELETE /v1/secrets?name=a&name=b&unscoped=`
pub async fn delete_collection(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Deleted> {
    observe("delete_collection", async move {
        let Query(pairs) = query.map_err(|e| query_error(&e))?;
        let (names, opts) = collection_params(pairs)?;
        let username = username(&headers)?;

        state
            .factory
            .secrets()
            .delete_collection(&username, &names, opts)
            .await
            .map_err(|e| ApiError::database(&e))?;

        info!(username, names = ?names, unscoped = opts.unscoped, "Secrets deleted");
        Ok(no_content())
    })
    .await
}

/// Split repeated `name` parameters from the `unscoped` flag
fn collection_params(pairs: Vec<(String, String)>) -> ApiResult<(Vec<String>, DeleteOptions)> {
    let mut names = Vec::new();
    let mut opts = DeleteOptions::default();
    for (key, value) in pairs {
        match key.as_str() {
            "name" => names.push(value),
            "unscoped" => {
                opts.unscoped = value.parse().map_err(|e: std::str::ParseBoolError| {
                    ApiError::with_code(Code::Bind, format!("unscoped: {value:?}: {e}"))
                })?;
            }
            _ => {}
        }
    }
    Ok((names, opts))
}
