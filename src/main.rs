use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};

use lanshare::{net, AppState, Config, FileStore, PageRenderer, WebServer};

const DEFAULT_CONFIG_PATH: &str = "lanshare.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = lanshare::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        lanshare::logging::init_console_only(&config.logging.level);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> lanshare::Result<()> {
    let root = config.files.resolve_root()?;
    let host = net::resolve_host(&config.server.host)?;
    let pages = PageRenderer::load(Path::new(&config.templates.path))?;

    let state = AppState::new(FileStore::new(root), pages)
        .with_force_download(config.files.force_download);

    info!("LANSHARE - local network file sharing");
    let server = WebServer::new(
        SocketAddr::new(host, config.server.port),
        state,
        &config.web,
        &config.files,
    );
    server.run().await
}
