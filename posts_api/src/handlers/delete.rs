use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::DeleteError;
use crate::models::RequestedId;
use crate::state::AppContext;
use crate::store::PostStore;
use crate::token::{DeleteToken, TokenHash};

/// Deletes a post if `body` carries the token whose hash is stored with it.
///
/// Checks run in a fixed order and the first failure ends the request:
/// id, token, lookup, hash comparison, delete. Only the last step writes.
///
/// # Errors
/// See [`DeleteError`] for the failure taxonomy.
pub async fn delete_post<S: PostStore>(
    store: &S,
    raw_id: &str,
    body: &[u8],
) -> Result<(), DeleteError> {
    let id: RequestedId = raw_id.parse().map_err(|_| {
        tracing::warn!("rejected delete with invalid id: {raw_id:?}");
        DeleteError::InvalidId
    })?;

    let token = DeleteToken::from_body(body).ok_or_else(|| {
        tracing::warn!("rejected delete without a delete token");
        DeleteError::DeleteTokenRequired
    })?;

    let candidate = TokenHash::of(&token);

    // A fractional or out-of-range id cannot name a stored post.
    let Some(post_id) = id.post_id() else {
        tracing::info!("no post can have id {raw_id:?}");
        return Err(DeleteError::NotFound);
    };

    let post = match store.fetch_by_id(post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            tracing::info!("post {post_id} not found");
            return Err(DeleteError::NotFound);
        }
        Err(e) => {
            tracing::error!("failed to fetch post {post_id}: {e}");
            return Err(DeleteError::NotFound);
        }
    };

    if TokenHash::parse(&post.delete_token_hash).is_none() {
        tracing::warn!("post {post_id} has a malformed delete token hash");
    }

    if !candidate.matches(&post.delete_token_hash) {
        tracing::warn!("delete token mismatch for post {post_id}");
        return Err(DeleteError::InvalidDeleteToken);
    }

    match store.delete_by_id(post_id, &candidate).await {
        Ok(true) => {
            tracing::info!("deleted post {post_id}");
            Ok(())
        }
        // removed or changed by another request since the fetch
        Ok(false) => {
            tracing::warn!("post {post_id} changed before it could be deleted");
            Err(DeleteError::NotFound)
        }
        Err(e) => {
            tracing::error!("failed to delete post {post_id}: {e}");
            Err(DeleteError::Store(e))
        }
    }
}

/// `DELETE /api/posts/{id}`
pub async fn handler<S: PostStore>(
    State(state): State<AppContext<S>>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, DeleteError> {
    let Path(raw_id) = path.map_err(|e| {
        tracing::warn!("failed to extract post id: {e}");
        DeleteError::InvalidId
    })?;

    delete_post(state.store.as_ref(), &raw_id, &body).await?;

    Ok(Json(json!({ "ok": true })))
}
