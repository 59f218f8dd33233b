//! Response generation
//!
//! Opens the resolved target and turns the outcome into exactly one of:
//! 200 with the file streamed, 404, 403 or 500.

use hyper::body::Body;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use super::resolve::ResolvedTarget;
use crate::config::{RootKind, ServerConfig};
use crate::http::{self, FileBody, ResponseBody};
use crate::logger;

/// A response plus the body length when it is known up front
pub struct Served {
    pub response: Response<ResponseBody>,
    pub body_bytes: Option<u64>,
}

impl From<Response<ResponseBody>> for Served {
    fn from(response: Response<ResponseBody>) -> Self {
        let body_bytes = response.body().size_hint().exact();
        Self {
            response,
            body_bytes,
        }
    }
}

/// Serve `target`, converting every failure into its HTTP response
pub async fn respond(server: &ServerConfig, target: &ResolvedTarget) -> Served {
    let path = target.filesystem_path.as_path();

    if server.root_kind == RootKind::Other {
        logger::log_error(&format!(
            "Serve root {} is neither a file nor a directory",
            server.root_path.display()
        ));
        return http::build_invalid_root_response().into();
    }

    // A decoded %00 can never name a file
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        logger::log_file_not_found(path);
        return http::build_404_response().into();
    }

    let open_path = if server.root_is_directory() {
        match confine(server, path).await {
            Ok(canonical) => canonical,
            Err(response) => return response.into(),
        }
    } else {
        path.to_path_buf()
    };

    match open_file(&open_path).await {
        Ok(body) => {
            let body_bytes = body.file_len();
            Served {
                response: http::build_file_response(body),
                body_bytes,
            }
        }
        Err(e) => failure_response(path, &e).into(),
    }
}

/// Canonicalize `path` and require it to stay under the canonical root.
///
/// The canonical path is what gets opened, so a link swapped in after this
/// check is not followed.
async fn confine(server: &ServerConfig, path: &Path) -> Result<PathBuf, Response<ResponseBody>> {
    match fs::canonicalize(path).await {
        Ok(canonical) if canonical.starts_with(&server.canonical_root) => Ok(canonical),
        Ok(canonical) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                path.display(),
                canonical.display()
            ));
            Err(http::build_404_response())
        }
        Err(e) => Err(failure_response(path, &e)),
    }
}

async fn open_file(path: &Path) -> io::Result<FileBody> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    // index.html can itself be a directory; nothing to stream there
    if metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "target is a directory",
        ));
    }
    Ok(FileBody::new(file, path.to_path_buf()).with_len(metadata.len()))
}

/// Map an I/O failure on `path` to 404, 403 or 500 and log it
pub fn failure_response(path: &Path, err: &io::Error) -> Response<ResponseBody> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
            logger::log_file_not_found(path);
            http::build_404_response()
        }
        io::ErrorKind::PermissionDenied => {
            logger::log_permission_denied(path);
            http::build_403_response()
        }
        _ => {
            logger::log_serve_error(path, err);
            http::build_500_response()
        }
    }
}
