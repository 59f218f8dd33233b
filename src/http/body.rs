//! Streaming file body
//!
//! Reads the file in fixed-size chunks as hyper polls for data, so a response
//! never holds more than one chunk of the file in memory.

use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

use crate::logger;

/// Bytes read per frame
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Response body backed by an open file.
///
/// The handle is dropped as soon as the file is exhausted, a read fails, or
/// hyper drops the body because the client went away.
pub struct FileBody {
    file: Option<File>,
    buf: Box<[u8]>,
    path: PathBuf,
    len: Option<u64>,
}

impl FileBody {
    pub fn new(file: File, path: PathBuf) -> Self {
        Self {
            file: Some(file),
            buf: vec![0; CHUNK_SIZE].into_boxed_slice(),
            path,
            len: None,
        }
    }

    /// Record the file length observed at open time. Only used for logging;
    /// the file may still change underneath us, so no exact size hint is given.
    #[must_use]
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub const fn file_len(&self) -> Option<u64> {
        self.len
    }
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let Some(file) = this.file.as_mut() else {
            return Poll::Ready(None);
        };

        let mut read_buf = ReadBuf::new(&mut this.buf);
        match Pin::new(file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                this.file = None;
                logger::log_serve_error(&this.path, &e);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) => {
                let filled = read_buf.filled();
                if filled.is_empty() {
                    this.file = None;
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Ok(Frame::data(Bytes::copy_from_slice(filled)))))
                }
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.file.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::default()
    }
}
