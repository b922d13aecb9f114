//! Transport layer for the backend connector.

pub mod http;

pub use http::HttpTransport;
