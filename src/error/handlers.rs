//! Error handlers
//!
//! Maps errors to HTTP status codes and logs them at the right level.

use log::{error, warn};

use crate::error::types::{ApiError, FileOpsError};

/// Convert error to HTTP status code
pub fn error_to_http_status(err: &ApiError) -> u16 {
    match err {
        ApiError::MalformedRequest(_) => 400,
        ApiError::MethodNotAllowed => 405,
        ApiError::RouteNotFound => 404,
        ApiError::PayloadTooLarge(_) => 413,
        ApiError::RequestTimeout => 408,
        ApiError::ServiceUnavailable => 503,
        ApiError::FileOps(e) => match e {
            FileOpsError::InvalidName(_) => 400,
            FileOpsError::NotFound(_) => 404,
            FileOpsError::AlreadyExists(_) => 409,
            FileOpsError::Initialization { .. } | FileOpsError::Storage { .. } => 500,
        },
    }
}

/// Log an error that is about to be returned to a client.
///
/// Server-side faults go to `error`, client mistakes to `warn`.
pub fn handle_error(err: &ApiError) {
    if error_to_http_status(err) >= 500 {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_ops_errors_map_to_one_status_each() {
        let cases = [
            (FileOpsError::InvalidName("..".into()), 400),
            (FileOpsError::AlreadyExists("a.txt".into()), 409),
            (FileOpsError::NotFound("a.txt".into()), 404),
            (
                FileOpsError::storage("read", io::Error::other("disk on fire")),
                500,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(error_to_http_status(&ApiError::from(err)), status);
        }
    }

    #[test]
    fn test_storage_message_hides_io_details() {
        let err = ApiError::from(FileOpsError::storage(
            "write",
            io::Error::other("/secret/path: EACCES"),
        ));
        let msg = err.public_message();
        assert_eq!(msg, "Internal storage error");
        assert!(!msg.contains("secret"));
    }

    #[test]
    fn test_router_errors() {
        assert_eq!(error_to_http_status(&ApiError::MethodNotAllowed), 405);
        assert_eq!(error_to_http_status(&ApiError::RouteNotFound), 404);
        assert_eq!(error_to_http_status(&ApiError::PayloadTooLarge(10)), 413);
        assert_eq!(error_to_http_status(&ApiError::RequestTimeout), 408);
        assert_eq!(
            error_to_http_status(&ApiError::MalformedRequest("Invalid JSON".into())),
            400
        );
    }
}
