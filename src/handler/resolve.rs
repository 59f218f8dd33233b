//! Request path to filesystem path resolution
//!
//! Never fails: anything that goes wrong here (missing file, unreadable
//! directory) is left for `respond` to discover when it opens the target.

use percent_encoding::percent_decode_str;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::config::{RootKind, ServerConfig};

/// File served when a request resolves to a directory
pub const INDEX_FILE: &str = "index.html";

/// The path one request will read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub filesystem_path: PathBuf,
}

/// Map the request's path component onto the serve root.
///
/// A file root always resolves to itself. A directory root is joined with the
/// decoded request path, and a directory hit falls back to [`INDEX_FILE`].
pub async fn resolve(server: &ServerConfig, request_path: &str) -> ResolvedTarget {
    let filesystem_path = match server.root_kind {
        RootKind::File | RootKind::Other => server.root_path.clone(),
        RootKind::Directory => {
            let decoded = percent_decode_str(request_path).decode_utf8_lossy();
            let relative = decoded.strip_prefix('/').unwrap_or(&decoded);
            let joined = join_confined(&server.root_path, relative);

            match fs::metadata(&joined).await {
                Ok(meta) if meta.is_dir() => joined.join(INDEX_FILE),
                _ => joined,
            }
        }
    };

    ResolvedTarget { filesystem_path }
}

/// Join `relative` under `root` without ever climbing above it.
///
/// `..` drops the previous segment and is a no-op at the root; `.`, root and
/// drive prefixes are discarded.
pub fn join_confined(root: &Path, relative: &str) -> PathBuf {
    let mut segments: Vec<&OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let mut joined = root.to_path_buf();
    joined.extend(segments);
    joined
}
