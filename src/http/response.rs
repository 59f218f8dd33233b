//! HTTP response building module
//!
//! Every response the server sends is built here: the streamed 200 and the
//! fixed plain-text error bodies.

use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::io;

use super::body::FileBody;

/// Body type shared by streamed and fixed responses
pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Content type sent with every served file
pub const SERVED_CONTENT_TYPE: &str = "text/html";

pub const NOT_FOUND_BODY: &str = "Not Found";
pub const PERMISSION_DENIED_BODY: &str = "Permission Denied";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";
pub const INVALID_ROOT_BODY: &str = "Internal Server Error: Invalid serve path type";

/// Wrap fixed bytes in the shared body type
pub fn full(content: impl Into<Bytes>) -> ResponseBody {
    Full::new(content.into())
        .map_err(|never| match never {})
        .boxed()
}

/// 200 with the file streamed as the body
pub fn build_file_response(body: FileBody) -> Response<ResponseBody> {
    let mut response = Response::new(body.boxed());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(SERVED_CONTENT_TYPE));
    response
}

fn build_text_response(status: StatusCode, message: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(full(message))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(full(message));
            *fallback.status_mut() = status;
            fallback
        })
}

pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

pub fn build_403_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::FORBIDDEN, PERMISSION_DENIED_BODY)
}

pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}

/// 500 for a root that is neither a file nor a directory
pub fn build_invalid_root_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, INVALID_ROOT_BODY)
}

fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
