mod args;
mod config;

use std::env;
use std::io;
use std::net::SocketAddr;

use app_api::{
    AppContext, CacheClearRequest, ContributionsRequest, GfgCountQuery, ProfileRequest,
};
use http_api::{HttpState, generate_api_token};
use serde::Serialize;
use stats_app::{AppPaths, AppState, ensure_app_data_dir};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::args::Command;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(io::stderr)
        .init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;
    if args.command == Command::Help {
        args::print_help();
        return Ok(());
    }

    let loaded = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    if loaded.created {
        info!(
            file = %loaded.file.display(),
            port = loaded.config.port,
            "created default config"
        );
    }
    let mut cli_config = loaded.config;
    cli_config.apply_env(|var| env::var(var).ok());

    let data_dir = config::data_dir().map_err(io::Error::other)?;
    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
    info!(data_dir = %paths.app_data_dir.display(), "using data dir");

    let app_state = AppState::new(cli_config.app_config(paths.db_path.clone()))?;
    app_state
        .initialize()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    let context = AppContext {
        app_state,
        app_data_dir: paths.app_data_dir,
    };

    match args.command {
        Command::Serve { port } => serve(context, port.unwrap_or(cli_config.port)).await?,
        Command::Dashboard { refresh } => {
            let req = ProfileRequest::default();
            let stats = if refresh {
                app_api::refresh(&context, req).await?
            } else {
                app_api::dashboard(&context, req).await?
            };
            print_json(&stats)?;
        }
        Command::Contributions { user } => {
            let report = app_api::contributions(&context, ContributionsRequest { user }).await?;
            if let Some(error) = &report.error {
                warn!(%error, "contributions unavailable");
            }
            print_json(&report)?;
        }
        Command::GfgCount { user } => {
            let response = app_api::gfg_count(&context, GfgCountQuery { user }).await?;
            print_json(&response)?;
        }
        Command::CacheList => print_json(&app_api::cache_list(&context)?)?,
        Command::CacheClear { source } => {
            print_json(&app_api::cache_clear(&context, CacheClearRequest { source })?)?
        }
        Command::Help => args::print_help(),
    }

    Ok(())
}

async fn serve(context: AppContext, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let api_token = generate_api_token();
    let state = HttpState::new(context, api_token.clone());
    let router = http_api::router(state);

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        warn!(
            configured = port,
            actual = actual_port,
            "configured port unavailable, using fallback for this run"
        );
    }

    info!(url = %format!("http://127.0.0.1:{actual_port}"), "codestats is running");
    println!("API token: {api_token}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
