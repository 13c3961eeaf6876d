use std::sync::Arc;

use anyhow::Context;
use pixpress_server::settings::{get_config, Config};
use pixpress_server::{init_openapi_route, AppState};
use poem::listener::TcpListener;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);

    match &config.log_dir {
        // Logging to File
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "pixpress.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_max_level(log_level)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(log_level)
                .with_target(false)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config().context("failed to load configuration")?;
    let _guard = init_tracing(&config);

    if config.uses_env_file() {
        tracing::info!("using .env file as environment variable");
    } else {
        tracing::info!("using server environment as environment variable");
    }
    tracing::info!("run with config: {:?}", config);

    let address = config.bind_address();
    let app_state = Arc::new(AppState::new(config));
    let app = init_openapi_route(app_state);

    tracing::info!("run server on {}", address);
    poem::Server::new(TcpListener::bind(address))
        .run(app)
        .await
        .context("server terminated")?;

    Ok(())
}
