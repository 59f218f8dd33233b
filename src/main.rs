use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use pathserve::config::{AppState, Config, ServerConfig};
use pathserve::error::StartupError;
use pathserve::{logger, server};

fn main() {
    if let Err(e) = run(std::env::args_os()) {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn run(mut args: impl Iterator<Item = OsString>) -> Result<(), StartupError> {
    let program = args
        .next()
        .map_or_else(|| "pathserve".to_string(), |p| p.to_string_lossy().into_owned());
    let root = args
        .next()
        .map(PathBuf::from)
        .ok_or(StartupError::MissingArgument { program })?;

    let cfg = Config::load()?;
    logger::init(&cfg).map_err(StartupError::LogInit)?;
    logger::log_serve_attempt(&root);

    // Checked before the runtime exists: a bad root never reaches bind
    let serve = ServerConfig::probe(root, cfg.server.port)?;
    let addr = cfg.get_socket_addr().map_err(StartupError::InvalidAddress)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg, serve, addr))
}

async fn async_main(cfg: Config, serve: ServerConfig, addr: SocketAddr) -> Result<(), StartupError> {
    let listener = server::create_listener(addr).map_err(|e| StartupError::Bind(addr, e))?;

    let shutdown = server::shutdown_signal();
    let state = Arc::new(AppState::new(serve, &cfg));
    logger::log_server_start(&addr, &state.server, &cfg);

    server::start_server_loop(listener, state, cfg.performance.clone(), shutdown).await;

    Ok(())
}
