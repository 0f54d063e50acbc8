use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{self, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, ORIGIN},
    },
    response::IntoResponse,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer,
};

/// Response for any route the service does not know about.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/json")],
        Json(json!({
            "ok": false,
            "error": "NOT_FOUND",
        })),
    )
}

/// Wraps a router with the request tracing, CORS and compression layers and
/// the JSON fallback used by every Postboard API.
pub fn with_standard_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let trace_layer = TraceLayer::new_for_http().on_request(
        |request: &Request<Body>, _: &tracing::Span| {
            tracing::info!(
                "received request: {method} {uri}",
                method = request.method(),
                uri = request.uri()
            );
        },
    );

    // Deletion is authorized by the token in the body, so no
    // AUTHORIZATION header is accepted from browsers.
    let cors_layer = CorsLayer::new()
        .allow_headers([ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, ORIGIN])
        .allow_methods(tower_http::cors::Any)
        .allow_origin(tower_http::cors::Any);

    let compression_layer = CompressionLayer::new().gzip(true).deflate(true);

    router
        .fallback(not_found)
        .layer(cors_layer)
        .layer(trace_layer)
        .layer(compression_layer)
}

/// Runs an Axum router in either local development mode or Lambda runtime mode.
///
/// In debug builds (`#[cfg(debug_assertions)]`), the router is served on
/// `local_addr` using a standard Axum server.
///
/// In release builds, the router is wrapped with the Lambda runtime adapter
/// and executed as a Lambda function; `local_addr` is ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The local server fails to bind to the address (debug mode)
/// - The Lambda runtime fails to start (release mode)
#[cfg_attr(not(debug_assertions), allow(unused_variables))]
pub async fn run_app(
    app: Router,
    local_addr: SocketAddr,
) -> Result<(), axum::BoxError> {
    #[cfg(debug_assertions)]
    {
        let listener = tokio::net::TcpListener::bind(local_addr).await?;
        tracing::info!("Starting local development server on http://{local_addr}");
        axum::serve(listener, app).await?;
    }

    #[cfg(not(debug_assertions))]
    {
        use lambda_http::tower;

        let app = tower::ServiceBuilder::new()
            .layer(axum_aws_lambda::LambdaLayer::default().trim_stage())
            .service(app);

        lambda_http::run(app).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route_uses_json_fallback() {
        let app = with_standard_layers(
            Router::new().route("/known", get(|| async { "ok" })),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "ok": false, "error": "NOT_FOUND" })
        );
    }

    #[tokio::test]
    async fn test_known_route_passes_through_layers() {
        let app = with_standard_layers(
            Router::new().route("/known", get(|| async { "ok" })),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/known")
                    .header(ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
