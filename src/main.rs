use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use export_edge::config::{self, AppState};
use export_edge::handler::Pipeline;
use export_edge::logger;
use export_edge::server::{self, listener::DEFAULT_BACKLOG, SignalHandler};
use export_edge::store::DirectoryStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 配置文件路径（不含扩展名），默认 "config"
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, DEFAULT_BACKLOG)?;

    let store = DirectoryStore::new(&cfg.site.asset_dir);
    if !store.root().is_dir() {
        logger::log_warning(&format!(
            "Asset directory '{}' does not exist; every lookup will miss",
            store.root().display()
        ));
    }

    let pipeline = Pipeline::new(cfg.site_options(), Arc::new(store));
    let state = Arc::new(AppState::new(&cfg, pipeline));
    let active_connections = Arc::new(AtomicUsize::new(0));
    let signals = Arc::new(SignalHandler::new());

    server::start_signal_handler(Arc::clone(&signals), Arc::clone(&state));
    logger::log_server_start(&addr, &cfg);

    server::run_server_loop(
        listener,
        state,
        Arc::clone(&active_connections),
        Arc::clone(&signals.shutdown),
    )
    .await;

    if signals.shutdown_requested.load(Ordering::SeqCst) {
        let grace = Duration::from_secs(cfg.performance.write_timeout);
        server::shutdown::drain_connections(&active_connections, grace).await;
    }

    logger::log_info("Server stopped");
    Ok(())
}
