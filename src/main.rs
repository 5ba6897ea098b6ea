use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

/// Config file used when no path is given on the command line (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let profile = config::Profile::from_env()?;
    let cfg = config::Config::load_from(&config_path, profile)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sizing worker threads from configuration
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
    let listener = server::create_listener(addr)?;

    if cfg.debug && cfg.profile != config::Profile::Development {
        logger::log_warning(&format!(
            "Debug mode is enabled under the {} profile; error pages will expose internals",
            cfg.profile
        ));
    }

    let state = Arc::new(config::AppState::new(cfg)?);
    logger::log_server_start(&addr, &state.config);
    logger::log_route_table(state.router.routes());

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::serve(listener, state, signals)).await
}
