/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → JwtAuth 生成 → Router 組み立て
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, services::auth::JwtAuth};

fn init_tracing() {
    // RUST_LOG=info,jwt_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    // Misconfiguration stops startup before any request is served.
    let auth = JwtAuth::new(config.auth_options())?;

    tracing::info!(
        algorithms = ?config.jwt_algorithms,
        "starting in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let app = build_router(auth, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(auth: JwtAuth, config: &Config) -> Router {
    let router = Router::new().nest("/api/v1", api::v1::routes(auth));
    middleware::http::apply(router, config)
}
