#![forbid(unsafe_code)]

mod app_config;
mod http_tracing;
mod models;
mod repository;
mod routes;
mod store_connector;
mod submission_handler;
mod validation;

use std::{process::exit, sync::Arc};

use app_config::AppConfig;
use repository::{setup_database, FeedbackRepository};
use routes::AppState;
use store_connector::StoreConnector;
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "student_feedback=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    if let Err(err) = run(app_config).await {
        error!("Server failed: {err:#}");
        exit(255);
    }
}

async fn run(app_config: AppConfig) -> anyhow::Result<()> {
    let shutdown_notify = Arc::new(Notify::new());

    let repository = match setup_database(&app_config.database_url).await {
        Ok(pool) => {
            let repository = Arc::new(FeedbackRepository::connected(pool));
            match repository.count().await {
                Ok(count) => info!("Store holds {count} feedback records"),
                Err(err) => warn!("Could not count stored feedback: {err}"),
            }
            repository
        }
        Err(err) => {
            error!("Could not setup database, feedback will only be logged: {err:#}");
            let repository = Arc::new(FeedbackRepository::disconnected());

            if let Some(interval) = app_config.store_reconnect_interval() {
                StoreConnector::create_and_start(
                    shutdown_notify.clone(),
                    app_config.database_url.clone(),
                    interval,
                    repository.clone(),
                );
            }

            repository
        }
    };

    let app = routes::router(
        AppState {
            store: repository.clone(),
        },
        &app_config.public_dir,
    );

    let listener = TcpListener::bind((app_config.host.as_str(), app_config.port)).await?;
    info!("Server running on port {}", app_config.port);

    let server_shutdown = shutdown_notify.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = signal::ctrl_c().await {
                error!("Could not listen for Ctrl-C: {err}");
                std::future::pending::<()>().await;
            }
            info!("Ctrl-C received, shutting down");
            server_shutdown.notify_waiters();
        })
        .await?;

    repository.close().await;

    Ok(())
}
