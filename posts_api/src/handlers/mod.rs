use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppContext;
use crate::store::PostStore;

pub mod delete;
pub mod health;

/// Builds the service router around a post store.
pub fn router<S: PostStore>(context: AppContext<S>) -> Router {
    let app = Router::new()
        .route("/api/posts/{id}", delete(delete::handler::<S>))
        .route("/health", get(health::handler));

    pb_axum::with_standard_layers(app).with_state(context)
}
