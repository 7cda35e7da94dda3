// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for profile deploy and download.
//!
//! Every failure is logged with its full cause chain and answered with an
//! opaque `500 InternalServerError`; no backend detail reaches the caller.

use crate::domain::ProfileError;
use crate::service::{ProfileService, PROFILE_FILE_NAME};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Route accepting a JSON profile to deploy.
pub const DEPLOY_PATH: &str = "/api/v1/profile/deploy";

/// Route returning the deployed profile as a TOML attachment.
pub const DOWNLOAD_PATH: &str = "/api/v1/profile/download";

/// Route answering `pong` while the HTTP service is up.
pub const PING_PATH: &str = "/api/v1/ping";

/// Media type of downloaded profiles.
pub const TOML_CONTENT_TYPE: &str = "application/x-toml;charset=UTF-8";

const INTERNAL_ERROR_BODY: &str = "InternalServerError";

/// Builds the router exposing the profile operations.
///
/// Request bodies are not size-limited; a profile of any size reaches
/// [`ProfileService::deploy`].
///
/// # Examples
///
/// ```rust,no_run
/// use profile_sync::adapters::{router, BackendFactory};
/// use profile_sync::domain::RegistryConfig;
/// use profile_sync::service::ProfileService;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> std::io::Result<()> {
/// let service = ProfileService::new(RegistryConfig::default(), Arc::new(BackendFactory::new()));
/// let app = router(Arc::new(service));
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:4000").await?;
/// axum::serve(listener, app).await
/// # }
/// ```
pub fn router(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(DEPLOY_PATH, post(deploy_profile))
        .route(DOWNLOAD_PATH, get(download_profile))
        .route(PING_PATH, get(ping))
        .layer(DefaultBodyLimit::disable())
        .with_state(service)
}

/// Deploys the JSON object in the request body.
///
/// Route: POST /api/v1/profile/deploy
pub async fn deploy_profile(
    State(service): State<Arc<ProfileService>>,
    body: Bytes,
) -> Result<&'static str, ProfileError> {
    service.deploy(&body).await?;
    Ok("ok")
}

/// Returns the deployed profile as a downloadable TOML file.
///
/// Route: GET /api/v1/profile/download
pub async fn download_profile(
    State(service): State<Arc<ProfileService>>,
) -> Result<Response, ProfileError> {
    let text = service.download().await?;
    let disposition = format!("attachment;filename=\"{}\"", PROFILE_FILE_NAME);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, TOML_CONTENT_TYPE)],
        [(header::CONTENT_DISPOSITION, disposition)],
        text,
    )
        .into_response())
}

/// Route: GET /api/v1/ping
pub async fn ping() -> &'static str {
    "pong"
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), "{}", self.chain());
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BackendFactory, MemoryRegistry};
    use crate::domain::{ConfigMap, ConfigValue, RegistryConfig, RegistryKind};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Router, MemoryRegistry, String) {
        let memory = MemoryRegistry::new();
        let registry = RegistryConfig {
            kind: RegistryKind::Memory,
            ..Default::default()
        };
        let key = registry.configuration_key();
        let service = ProfileService::new(
            registry,
            Arc::new(BackendFactory::with_memory(memory.clone())),
        );
        (router(Arc::new(service)), memory, key)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_deploy_returns_ok() {
        let (app, memory, key) = app();
        let request = Request::post(DEPLOY_PATH)
            .body(Body::from(r#"{"Writable": {"LogLevel": "INFO"}}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
        assert!(memory.get(&key).is_some());
    }

    #[tokio::test]
    async fn test_deploy_bare_array_is_internal_error() {
        let (app, memory, _key) = app();
        let request = Request::post(DEPLOY_PATH)
            .body(Body::from("[1, 2]"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, INTERNAL_ERROR_BODY);
        assert_eq!(memory.writes(), 0);
    }

    #[tokio::test]
    async fn test_download_sets_attachment_headers() {
        let (app, memory, key) = app();
        memory.seed(&key, ConfigValue::Mapping(ConfigMap::new()));
        let request = Request::get(DOWNLOAD_PATH).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/x-toml;charset=UTF-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment;filename=\"configuration.toml\""
        );
        assert!(body_text(response).await.trim().is_empty());
    }

    #[tokio::test]
    async fn test_download_hides_error_detail() {
        let (app, memory, key) = app();
        memory.seed(&key, ConfigValue::from("scalar"));
        let request = Request::get(DOWNLOAD_PATH).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, INTERNAL_ERROR_BODY);
        assert!(!body.contains("mapping"));
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _memory, _key) = app();
        let request = Request::get(PING_PATH).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "pong");
    }
}
