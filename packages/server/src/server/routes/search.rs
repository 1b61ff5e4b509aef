//! Keyword search endpoint.

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::common::AppResult;
use crate::domains::posts::actions::search;
use crate::server::app::AxumAppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

pub async fn search_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let results = search(&query.keyword, &state.deps.db_pool).await?;
    Ok(Json(json!({
        "success": true,
        "users": results.users,
        "posts": results.posts,
    })))
}
