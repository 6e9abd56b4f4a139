use std::{sync::Arc, time::Duration};

use tokio::{select, sync::Notify, task::JoinHandle};
use tracing::{info, info_span, warn, Instrument};

use crate::repository::{setup_database, FeedbackRepository};

/// Background task that keeps trying to reach the database after a failed
/// startup connection, and attaches the pool once it succeeds.
pub struct StoreConnector {
    database_url: String,
    interval: Duration,
    repository: Arc<FeedbackRepository>,
}

impl StoreConnector {
    pub fn create_and_start(
        shutdown: Arc<Notify>,
        database_url: String,
        interval: Duration,
        repository: Arc<FeedbackRepository>,
    ) -> JoinHandle<()> {
        let connector = StoreConnector {
            database_url,
            interval,
            repository,
        };

        tokio::spawn(connector.run(shutdown).instrument(info_span!("store_connector")))
    }

    async fn run(self, shutdown: Arc<Notify>) {
        loop {
            info!("Next store connection attempt in {:?}", self.interval);

            select! {
                _ = shutdown.notified() => {
                    info!("Shutdown received, giving up on the store");
                    return;
                }

                _ = tokio::time::sleep(self.interval) => {
                    if self.try_connect().await {
                        return;
                    }
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn try_connect(&self) -> bool {
        match setup_database(&self.database_url).await {
            Ok(pool) => {
                self.repository.attach(pool).await;
                info!("Store connected, feedback will be persisted again");
                true
            }
            Err(err) => {
                warn!("Store is still unreachable: {err:#}");
                false
            }
        }
    }
}
