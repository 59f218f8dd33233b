//! pathserve - serve a single file or a directory tree over HTTP
//!
//! Request paths are resolved against the serve root (`handler::resolve`),
//! then opened and streamed back or mapped to 404/403/500 (`handler::respond`).

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
