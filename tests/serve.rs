//! End-to-end requests against a live listener on an ephemeral port.

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use pathserve::config::{AppState, Config, ServerConfig};
use pathserve::server;

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Running {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.task.await.unwrap();
    }
}

fn start(root: &Path) -> Running {
    let cfg = Config::load_from("no-such-config-file").unwrap();
    let listener = server::create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();

    let serve = ServerConfig::probe(root, addr.port()).unwrap();
    let state = Arc::new(AppState::quiet(serve));
    let (stop, stopped) = oneshot::channel::<()>();

    let task = tokio::spawn(server::start_server_loop(
        listener,
        state,
        cfg.performance,
        async move {
            let _ = stopped.await;
            "test finished"
        },
    ));

    Running { addr, stop, task }
}

async fn fetch(addr: SocketAddr, method: Method, path: &str) -> (StatusCode, String, Bytes) {
    let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();
    let req = Request::builder()
        .method(method)
        .uri(format!("http://{addr}{path}"))
        .body(Empty::new())
        .unwrap();

    let response = client.request(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, body)
}

#[tokio::test]
async fn serves_directory_site() {
    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "hello").unwrap();
    std::fs::write(site.path().join("about.html"), "about").unwrap();
    std::fs::create_dir(site.path().join("blog")).unwrap();
    std::fs::write(site.path().join("blog/index.html"), "posts").unwrap();

    let running = start(site.path());
    let addr = running.addr;

    let (status, content_type, body) = fetch(addr, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, "hello");

    let (status, _, body) = fetch(addr, Method::GET, "/about.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "about");

    let (status, _, body) = fetch(addr, Method::GET, "/blog/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "posts");

    let (status, content_type, body) = fetch(addr, Method::GET, "/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "Not Found");

    let (status, _, body) = fetch(addr, Method::HEAD, "/about.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    running.shutdown().await;
}

#[tokio::test]
async fn streams_large_single_file_for_any_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bundle.js");
    let data: Vec<u8> = (0..=255u8).cycle().take(1_000_000).collect();
    std::fs::write(&file, &data).unwrap();

    let running = start(&file);

    for path in ["/", "/bundle.js", "/deep/nested/path?x=1"] {
        let (status, content_type, body) = fetch(running.addr, Method::GET, path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/html");
        assert_eq!(body.as_ref(), data.as_slice());
    }

    running.shutdown().await;
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let site = tempfile::tempdir().unwrap();
    for i in 0..8 {
        std::fs::write(site.path().join(format!("{i}.html")), format!("page {i}")).unwrap();
    }

    let running = start(site.path());
    let addr = running.addr;

    let requests = (0..8).map(|i| {
        tokio::spawn(async move { (i, fetch(addr, Method::GET, &format!("/{i}.html")).await) })
    });
    for handle in requests.collect::<Vec<_>>() {
        let (i, (status, _, body)) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("page {i}"));
    }

    running.shutdown().await;
}

/// Open descriptors in this process that point at `path`
#[cfg(target_os = "linux")]
fn open_handles(path: &Path) -> usize {
    std::fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(Result::ok)
        .filter(|fd| std::fs::read_link(fd.path()).is_ok_and(|target| target == path))
        .count()
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn client_disconnect_releases_file_handle() {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    // Larger than loopback socket buffers, so the body is still mid-stream
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("huge.bin");
    std::fs::write(&file, vec![b'x'; 32 * 1024 * 1024]).unwrap();
    let canonical = file.canonicalize().unwrap();

    let running = start(&file);

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    stream
        .write_all(b"GET /huge.bin HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut head = [0u8; 4096];
    let n = stream.read(&mut head).await.unwrap();
    assert!(String::from_utf8_lossy(&head[..n]).starts_with("HTTP/1.1 200"));
    assert!(open_handles(&canonical) >= 1);

    drop(stream);

    let mut released = false;
    for _ in 0..100 {
        if open_handles(&canonical) == 0 {
            released = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(released, "file still open after the client went away");

    running.shutdown().await;
}
