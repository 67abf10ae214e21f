//! HTTP request/response model and the `tiny_http` transport.

pub mod http_server;
pub mod request;
pub mod response;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_urlencoded, Request};
pub use response::{Response, APPLICATION_JSON_UTF8, TEXT_HTML_UTF8, TEXT_PLAIN_UTF8};
