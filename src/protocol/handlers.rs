//! Request handlers for the file API.
//!
//! Dispatches a routed request to the file operations and turns the outcome
//! into a JSON response with the matching status code.

use serde::Deserialize;
use serde_json::json;

use crate::error::handlers::handle_error;
use crate::error::ApiError;
use crate::protocol::responses::{CREATED, HttpResponse, OK};
use crate::protocol::routes::{Route, route};
use crate::storage::FileOperations;

/// Body of `POST /api/files`
#[derive(Debug, Deserialize)]
struct CreateFileRequest {
    filename: Option<String>,
    content: Option<String>,
}

/// Dispatches a request to its handler.
///
/// `path` excludes the query string. Never fails: every error becomes an
/// error response.
pub async fn handle_request(
    ops: &FileOperations,
    method: &str,
    path: &str,
    body: &[u8],
) -> HttpResponse {
    let result = match route(method, path) {
        Route::Health => Ok(HttpResponse::json(OK, &json!({ "status": "healthy" }))),
        Route::ListFiles => handle_list(ops).await,
        Route::CreateFile => handle_create(ops, body).await,
        Route::GetFile(name) => handle_read(ops, &name).await,
        Route::DeleteFile(name) => handle_delete(ops, &name).await,
        Route::MethodNotAllowed(allow) => {
            let err = ApiError::MethodNotAllowed;
            handle_error(&err);
            return HttpResponse::error(&err).with_header("Allow", allow);
        }
        Route::NotFound => Err(ApiError::RouteNotFound),
    };

    result.unwrap_or_else(|err| {
        handle_error(&err);
        HttpResponse::error(&err)
    })
}

async fn handle_list(ops: &FileOperations) -> Result<HttpResponse, ApiError> {
    let files = ops.list().await?;
    Ok(HttpResponse::json(OK, &json!({ "files": files })))
}

async fn handle_create(ops: &FileOperations, body: &[u8]) -> Result<HttpResponse, ApiError> {
    let request: CreateFileRequest = serde_json::from_slice(body)
        .map_err(|_| ApiError::MalformedRequest("Invalid JSON".into()))?;

    let (filename, content) = match (request.filename, request.content) {
        (Some(filename), Some(content)) if !filename.is_empty() => (filename, content),
        _ => {
            return Err(ApiError::MalformedRequest(
                "Filename and content are required".into(),
            ));
        }
    };

    let created = ops.create(&filename, &content).await?;
    Ok(HttpResponse::json(CREATED, &created))
}

async fn handle_read(ops: &FileOperations, filename: &str) -> Result<HttpResponse, ApiError> {
    let file = ops.read(filename).await?;
    Ok(HttpResponse::json(OK, &file))
}

async fn handle_delete(ops: &FileOperations, filename: &str) -> Result<HttpResponse, ApiError> {
    let result = ops.delete(filename).await?;
    Ok(HttpResponse::json(OK, &result))
}
