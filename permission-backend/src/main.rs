// src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use migration::{Migrator, MigratorTrait};
use permission_backend::api::handlers::permission_handler::permission_router;
use permission_backend::config::Config;
use permission_backend::db::create_db_pool;
use permission_backend::service::permission_service::PermissionService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permission_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Permission Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Configuration loaded: {:?}", app_config);

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // マイグレーションを適用
    Migrator::up(&db_pool, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied.");

    // PermissionServiceの作成
    let permission_service = Arc::new(PermissionService::new(db_pool));

    // ルーターの設定
    let app_router = permission_router(permission_service);

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr
    );

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
