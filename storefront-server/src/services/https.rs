use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::{Router, middleware};
use http::HeaderValue;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", "{} {} {} {}ms", method, uri, status, latency_ms);

    response
}

/// 未匹配路由
async fn route_not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

/// 路由存在但方法不匹配
async fn method_not_allowed() -> AppError {
    AppError::new(ErrorCode::MethodNotAllowed)
}

/// Credentialed CORS for the configured frontend origins only
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> http::Response<axum::body::Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");
    AppError::internal("Internal server error").into_response()
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        // Accounts
        .merge(crate::api::user::router())
        .merge(crate::api::address::router())
        // Catalog
        .merge(crate::api::category::router())
        .merge(crate::api::product::router())
        .merge(crate::api::review::router())
        // Shopping
        .merge(crate::api::cart::router())
        .merge(crate::api::my_list::router())
        .merge(crate::api::order::router())
        // Content
        .merge(crate::api::banner::router())
        .merge(crate::api::blog::router())
        .merge(crate::api::home_slide::router())
}

/// Full application with state and middleware applied
pub fn build_router(state: ServerState) -> Router {
    let body_limit = state.config.max_body_mb * 1024 * 1024;

    let cors = cors_layer(&state.config.cors_origins);

    build_app()
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Method, Request, StatusCode, header};

    use crate::test_support::TestApp;

    fn with_origin(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_only_allows_configured_origins() {
        let app = TestApp::new().await;

        let (status, headers, _) = app.send(with_origin("https://evil.example")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let (_, headers, _) = app.send(with_origin("http://localhost:5173")).await;
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_wrong_method_is_enveloped_405() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/api/cart/add", None, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Method not allowed");
    }
}
