//! HTTP transport: retrying executor, backoff policy, header construction.

pub mod backoff;
pub mod headers;
pub mod http;

pub use backoff::BackoffPolicy;
pub use http::HttpTransport;
