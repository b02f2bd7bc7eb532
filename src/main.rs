// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use provenance_vault::{
    api::router,
    config::{
        DATA_DIR_ENV, DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, HOST_ENV,
        LOG_FORMAT_ENV, PORT_ENV,
    },
    state::AppState,
    store::FsObjectStore,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Object store handle: constructed once here, injected everywhere else.
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let store = Arc::new(FsObjectStore::new(&data_dir));
    tracing::info!(data_dir, "object store initialized");

    let state = AppState::new(store);
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_default()
        .parse()
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "provenance vault listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
