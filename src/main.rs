use std::path::Path;
use std::sync::Arc;

mod config;
mod data;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use crate::data::logo::LogoResolver;
use crate::error::StartupError;

/// Configuration file name, without extension
const CONFIG_FILE: &str = "config";
/// Bank data, read once at startup
const BANKS_FILE: &str = "./banks.json";
/// Directory holding `<slug>.png` logos, served under `/logo/`
const LOGO_DIR: &str = "./logos";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load_from(CONFIG_FILE).map_err(StartupError::from)?;
    logger::init(&cfg).map_err(StartupError::Logger)?;

    if let Err(e) = run(cfg) {
        logger::log_error(&format!("Startup failed: {e}"));
        return Err(e.into());
    }
    Ok(())
}

fn run(cfg: config::Config) -> Result<(), StartupError> {
    let banks = data::load_banks(Path::new(BANKS_FILE))?;
    logger::log_info(&format!("[DATA] Loaded {} banks from {BANKS_FILE}", banks.len()));

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg, banks))
}

async fn async_main(cfg: config::Config, banks: Vec<data::BankRecord>) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr()?;

    let logos = if cfg.logos.cache_listing {
        let resolver = LogoResolver::with_cached_listing(LOGO_DIR)
            .await
            .map_err(|source| StartupError::Logos {
                path: LOGO_DIR.into(),
                source,
            })?;
        if let Some(count) = resolver.cached_count() {
            logger::log_info(&format!("[LOGO] Cached {count} entries from {LOGO_DIR}"));
        }
        resolver
    } else {
        LogoResolver::new(LOGO_DIR)
    };

    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    let bank_count = banks.len();
    let state = Arc::new(config::AppState::new(cfg, banks, logos));
    logger::log_server_start(&addr, &state.config, bank_count);

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
