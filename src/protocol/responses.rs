//! HTTP response handling
//!
//! Every response carries a pretty-printed JSON body.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Response, StatusCode};
use log::{error, warn};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::error::handlers::error_to_http_status;

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// A response ready to be written to the client
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Serializes `value` as the response body
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => Self {
                status,
                headers: Vec::new(),
                body,
            },
            Err(e) => {
                error!("Failed to serialize response body: {}", e);
                Self {
                    status: INTERNAL_SERVER_ERROR,
                    headers: Vec::new(),
                    body: "{\n  \"error\": \"Internal server error\",\n  \"status\": 500\n}".into(),
                }
            }
        }
    }

    /// Error body: `{"error": <message>, "status": <code>}`
    pub fn error(err: &ApiError) -> Self {
        let status = error_to_http_status(err);
        Self::json(
            status,
            &json!({
                "error": err.public_message(),
                "status": status,
            }),
        )
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Converts into the hyper response written by the connection.
    ///
    /// `Content-Length` is derived from the body by hyper.
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in self.headers {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(e) => warn!("Dropping invalid {} header value: {}", name, e),
            }
        }
        response
    }
}
