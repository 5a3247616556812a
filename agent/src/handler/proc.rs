//! HTTP handlers for `/proc` lookups.
//!
//! The URL path (percent-decoded) is the sub-path handed to the resolver.
//! Resolution runs on the blocking pool since it is plain filesystem I/O.

use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use procserve_core::errors::ProcError;
use procserve_core::proc::{ProcEntryResult, ProcResolver};
use tracing::{debug, error, warn};

/// Resolver shared by every request.
pub type SharedResolver = Arc<ProcResolver>;

const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn handle_root(State(resolver): State<SharedResolver>) -> Response {
    respond(resolver, String::new()).await
}

pub async fn handle_path(
    State(resolver): State<SharedResolver>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    match path {
        Ok(Path(sub_path)) => respond(resolver, sub_path).await,
        Err(rejection) => {
            warn!("Rejected request path: {}", rejection.body_text());
            let mut result = ProcEntryResult::default();
            result.fail(rejection.body_text());
            encode_response(StatusCode::BAD_REQUEST, &result)
        }
    }
}

/// Resolve `sub_path` and render the result as a JSON response.
pub async fn respond(resolver: SharedResolver, sub_path: String) -> Response {
    debug!("Resolving {:?}", sub_path);

    let joined = tokio::task::spawn_blocking(move || resolver.resolve(&sub_path)).await;
    let resolution = match joined {
        Ok(resolution) => resolution,
        Err(e) => {
            error!("Resolver task failed: {e}");
            let mut result = ProcEntryResult::default();
            result.fail(format!("internal error: {e}"));
            return encode_response(StatusCode::INTERNAL_SERVER_ERROR, &result);
        }
    };

    let status = match &resolution.error {
        None => StatusCode::OK,
        Some(e) => {
            warn!("Request for {:?} failed: {}", resolution.result.path, e);
            status_for(e)
        }
    };
    encode_response(status, &resolution.result)
}

/// Map a resolver failure to an HTTP status. Every failure is non-2xx.
pub fn status_for(error: &ProcError) -> StatusCode {
    match error {
        ProcError::Traversal => StatusCode::BAD_REQUEST,
        ProcError::SymlinkEscape { .. } => StatusCode::FORBIDDEN,
        ProcError::Unsupported { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ProcError::Resolution { .. } => match error.io_kind() {
            Some(ErrorKind::PermissionDenied) => StatusCode::FORBIDDEN,
            _ => StatusCode::NOT_FOUND,
        },
        ProcError::Io { .. } => match error.io_kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::PermissionDenied) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Serialize `result` with `status`. An encoding failure is logged and
/// answered with a 500 carrying a minimal error document.
pub fn encode_response(status: StatusCode, result: &ProcEntryResult) -> Response {
    match serde_json::to_vec(result) {
        Ok(body) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("Marshalling error: {e} ({result:?})");
            let body = serde_json::json!({
                "path": result.path,
                "err": format!("encoding error: {e}"),
            });
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
                body.to_string(),
            )
                .into_response()
        }
    }
}
