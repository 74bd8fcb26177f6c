//! Result sink implementations.

pub mod http;
pub mod log;

pub use self::http::HttpSink;
pub use self::log::LogSink;
