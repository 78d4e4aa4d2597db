//! Transport implementations
//!
//! Contains HttpTransport, FileTransport, LogTransport and the
//! config-driven `AnyTransport`.

mod any;
mod file;
mod http;
mod log;

pub use self::any::{create_transport, AnyTransport};
pub use self::file::FileTransport;
pub use self::http::{HttpTransport, HttpTransportConfig};
pub use self::log::LogTransport;
