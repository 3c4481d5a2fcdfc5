use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioIo, TokioTimer};
use log::{debug, info, warn};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::error::handlers::handle_error;
use crate::middleware::logging::log_request;
use crate::protocol::{HttpResponse, handle_request};
use crate::storage::FileOperations;

/// Serves HTTP/1.1 requests on one client connection until it closes.
///
/// - Request heads must arrive within the configured timeout, which also
///   bounds how long an idle keep-alive connection is held.
/// - Bodies are collected up to `max_body_bytes` and dispatched with
///   `handle_request` against the shared `FileOperations`.
/// - When `shutdown` flips, the in-flight request is finished and the
///   connection is then closed.
///
/// Dropping this future (e.g. on client disconnect) cancels any pending
/// filesystem call.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    ops: Arc<FileOperations>,
    config: Arc<ServerConfig>,
    mut shutdown: watch::Receiver<bool>,
) {
    let service = {
        let config = Arc::clone(&config);
        service_fn(move |request| {
            let ops = Arc::clone(&ops);
            let config = Arc::clone(&config);
            async move {
                Ok::<_, Infallible>(serve_request(request, client_addr, &ops, &config).await)
            }
        })
    };

    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(config.request_timeout())
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let mut draining = false;
    let result = loop {
        tokio::select! {
            result = connection.as_mut() => break result,
            _ = shutdown.changed(), if !draining => {
                draining = true;
                debug!("Closing {} once its current request completes", client_addr);
                connection.as_mut().graceful_shutdown();
            }
        }
    };

    match result {
        Ok(()) => info!("Client {} disconnected", client_addr),
        Err(e) if e.is_timeout() => info!("Client {} timed out", client_addr),
        Err(e) => warn!("Connection error from {}: {}", client_addr, e),
    }
}

/// Answers every request on a connection that arrived while the server
/// was at capacity with 503, then closes it.
pub async fn reject_client(stream: TcpStream, client_addr: SocketAddr, config: Arc<ServerConfig>) {
    let service = service_fn(move |request: Request<Incoming>| async move {
        let err = ApiError::ServiceUnavailable;
        handle_error(&err);
        let response = HttpResponse::error(&err);
        log_request(
            &client_addr,
            request.method().as_str(),
            request.uri().path(),
            response.status,
        );
        Ok::<_, Infallible>(response.into_hyper())
    });

    if let Err(e) = http1::Builder::new()
        .keep_alive(false)
        .timer(TokioTimer::new())
        .header_read_timeout(config.request_timeout())
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        debug!("Failed to reject {}: {}", client_addr, e);
    }
}

async fn serve_request(
    request: Request<Incoming>,
    client_addr: SocketAddr,
    ops: &FileOperations,
    config: &ServerConfig,
) -> Response<Full<Bytes>> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = match read_body(request.into_body(), config).await {
        Ok(body) => handle_request(ops, method.as_str(), &path, &body).await,
        Err(err) => {
            handle_error(&err);
            HttpResponse::error(&err)
        }
    };

    log_request(&client_addr, method.as_str(), &path, response.status);
    response.into_hyper()
}

/// Collects a request body of at most `max_body_bytes`.
///
/// A declared `Content-Length` over the limit is refused before anything
/// is read.
async fn read_body(body: Incoming, config: &ServerConfig) -> Result<Bytes, ApiError> {
    let limit = config.max_body_bytes;
    if body.size_hint().lower() > limit as u64 {
        return Err(ApiError::PayloadTooLarge(limit));
    }

    match timeout(config.request_timeout(), Limited::new(body, limit).collect()).await {
        Err(_) => Err(ApiError::RequestTimeout),
        Ok(Ok(collected)) => Ok(collected.to_bytes()),
        Ok(Err(e)) if e.is::<LengthLimitError>() => Err(ApiError::PayloadTooLarge(limit)),
        Ok(Err(e)) => {
            debug!("Failed to read request body: {}", e);
            Err(ApiError::MalformedRequest("Invalid request body".into()))
        }
    }
}
