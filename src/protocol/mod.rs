//! HTTP protocol implementation
//!
//! Handles routing and JSON response generation. Wire framing is done by
//! hyper in `client::handler`.

pub mod handlers;
pub mod responses;
pub mod routes;

pub use handlers::handle_request;
pub use responses::HttpResponse;
pub use routes::{Route, route};
