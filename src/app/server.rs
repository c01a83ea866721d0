//! Router and serve loop.
//!
//! ```text
//! /
//! ├── GET  /                  - single-page draw client
//! ├── GET  /api/participants  - participants who have not drawn yet
//! ├── POST /api/draw          - draw a task
//! ├── GET  /admin             - results table   (admin access)
//! ├── GET  /admin/raw         - results as JSON (admin access)
//! └── GET  /health            - liveness probe
//! ```

use crate::app::{admin, handlers};
use crate::config::{cli::LocalStorage, AdminAccess, DrawConfig};
use crate::core::draw::DrawService;
use crate::core::pool::load_list;
use crate::core::{ConfigProvider, Storage};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct AppState<S: Storage> {
    pub service: Arc<DrawService<S>>,
    pub static_dir: Option<String>,
    pub admin_access: Arc<AdminAccess>,
}

impl<S: Storage> AppState<S> {
    pub fn new(
        service: DrawService<S>,
        static_dir: Option<String>,
        admin_access: AdminAccess,
    ) -> Self {
        Self {
            service: Arc::new(service),
            static_dir,
            admin_access: Arc::new(admin_access),
        }
    }
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            static_dir: self.static_dir.clone(),
            admin_access: self.admin_access.clone(),
        }
    }
}

pub fn build_router<S: Storage + 'static>(state: AppState<S>) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_page::<S>))
        .route("/admin/raw", get(admin::admin_raw::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin::<S>,
        ));

    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/api/participants", get(handlers::list_participants::<S>))
        .route("/api/draw", post(handlers::draw::<S>))
        .route("/health", get(handlers::health))
        .merge(admin_routes)
        .with_state(state)
}

/// 啟動前檢查資料目錄與名單，並把目前狀態寫進日誌
async fn prepare_data_dir(config: &DrawConfig, storage: &LocalStorage) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let tasks = load_list(storage, config.tasks_file()).await?;
    let participants = load_list(storage, config.participants_file()).await?;

    if tasks.is_empty() {
        tracing::warn!(
            "⚠️ No tasks configured yet ({})",
            config.data_path(config.tasks_file()).display()
        );
    }
    tracing::info!(
        "📋 Loaded {} task slots and {} participants from {}",
        tasks.len(),
        participants.len(),
        config.data_dir
    );
    Ok(())
}

pub async fn run(config: DrawConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(config.data_dir.clone());
    prepare_data_dir(&config, &storage).await?;

    let service = DrawService::new(storage, &config);
    let app = build_router(AppState::new(
        service,
        config.static_dir.clone(),
        config.admin_access.clone(),
    ));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("🚀 HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("🔐 Admin access: {}", config.admin_access.label());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
