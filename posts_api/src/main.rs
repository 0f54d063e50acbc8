/*
 * This is the main entrypoint for the `posts_api` service.
 *
 * It serves `DELETE /api/posts/{id}`, which removes a post when the request
 * carries the delete token whose hash was stored with the post.
 *
 */
use std::net::SocketAddr;

use pb_app::AppContextError;

mod config;
mod error;
mod handlers;
mod models;
mod state;
mod store;
mod token;

use config::Config;
use state::AppContext;
use store::SupabaseStore;

struct Service {
    context: AppContext<SupabaseStore>,
    local_addr: SocketAddr,
}

impl pb_app::ContextProvider<Config> for Service {
    async fn new(config: Config) -> Result<Self, AppContextError> {
        // a zero timeout fails every store call, which reads as NOT_FOUND
        if config.store_timeout_seconds == 0 {
            return Err(AppContextError::Context(
                "STORE_TIMEOUT_SECONDS must be greater than zero".to_string(),
            ));
        }

        let store = SupabaseStore::new(
            &config.supabase_url,
            config.supabase_service_role_key.clone(),
            &config.posts_table,
            config.store_timeout(),
        )
        .map_err(|e| AppContextError::Context(e.to_string()))?;

        Ok(Self {
            context: AppContext::new(store),
            local_addr: config.local_addr,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), axum::BoxError> {
    let service =
        pb_app::create_app_context::<Service, Config>().await?;

    let app = handlers::router(service.context);

    pb_axum::run_app(app, service.local_addr).await
}
