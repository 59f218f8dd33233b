//! HTTP protocol layer module
//!
//! Response bodies and builders, kept apart from path resolution so the
//! handler only decides *which* response to send.

pub mod body;
pub mod response;

pub use body::FileBody;
pub use response::{
    build_403_response, build_404_response, build_500_response, build_file_response,
    build_invalid_root_response, ResponseBody,
};
