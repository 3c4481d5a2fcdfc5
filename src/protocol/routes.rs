//! Module `routes`
//!
//! Maps an HTTP method and path onto the operation that serves it.

/// Collection endpoint for files
pub const FILES_PATH: &str = "/api/files";

/// Health check endpoint
pub const HEALTH_PATH: &str = "/health";

/// Represents the operation selected for a request.
///
/// Item routes carry the raw path segment; validating it is the storage
/// layer's job.
#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    Health,
    ListFiles,
    CreateFile,
    GetFile(String),
    DeleteFile(String),
    /// Known path, unsupported method. Holds the `Allow` header value.
    MethodNotAllowed(&'static str),
    NotFound,
}

/// Resolves a request to a [`Route`].
pub fn route(method: &str, path: &str) -> Route {
    if path == HEALTH_PATH {
        return match method {
            "GET" => Route::Health,
            _ => Route::NotFound,
        };
    }

    let Some(rest) = path.strip_prefix(FILES_PATH) else {
        return Route::NotFound;
    };

    match rest {
        "" | "/" => match method {
            "GET" => Route::ListFiles,
            "POST" => Route::CreateFile,
            _ => Route::MethodNotAllowed("GET, POST"),
        },
        _ => match rest.strip_prefix('/') {
            Some(name) => match method {
                "GET" => Route::GetFile(name.to_string()),
                "DELETE" => Route::DeleteFile(name.to_string()),
                _ => Route::MethodNotAllowed("GET, DELETE"),
            },
            // e.g. "/api/filesystem"
            None => Route::NotFound,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_routes() {
        assert_eq!(route("GET", "/api/files"), Route::ListFiles);
        assert_eq!(route("GET", "/api/files/"), Route::ListFiles);
        assert_eq!(route("POST", "/api/files"), Route::CreateFile);
        assert_eq!(
            route("PUT", "/api/files"),
            Route::MethodNotAllowed("GET, POST")
        );
    }

    #[test]
    fn test_item_routes_keep_raw_name() {
        assert_eq!(
            route("GET", "/api/files/report.txt"),
            Route::GetFile("report.txt".into())
        );
        assert_eq!(
            route("DELETE", "/api/files/report.txt"),
            Route::DeleteFile("report.txt".into())
        );
        assert_eq!(
            route("GET", "/api/files/a/b"),
            Route::GetFile("a/b".into())
        );
        assert_eq!(
            route("PATCH", "/api/files/report.txt"),
            Route::MethodNotAllowed("GET, DELETE")
        );
    }

    #[test]
    fn test_everything_else_is_not_found() {
        assert_eq!(route("GET", "/health"), Route::Health);
        assert_eq!(route("POST", "/health"), Route::NotFound);
        assert_eq!(route("GET", "/"), Route::NotFound);
        assert_eq!(route("GET", "/api/filesystem"), Route::NotFound);
        assert_eq!(route("get", "/unknown"), Route::NotFound);
    }
}
