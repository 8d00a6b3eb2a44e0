use anyhow::Context;

use crate::config::AppConfig;
use crate::database;
use crate::generator::{build_generator, AnyGenerator};

pub struct Global {
    config: AppConfig,
    database: mongodb::Database,
    generator: AnyGenerator,
}

impl Global {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);

        tracing::debug!("setting up mongo client");

        let client = tokio::time::timeout(
            DEFAULT_TIMEOUT,
            mongodb::Client::with_uri_str(&config.database.uri),
        )
        .await
        .context("mongodb timeout")?
        .context("mongodb")?;

        let Some(database) = client.default_database() else {
            anyhow::bail!("no default database in mongodb uri")
        };

        // The process must not serve traffic with an unreachable store.
        tokio::time::timeout(
            DEFAULT_TIMEOUT,
            database.run_command(bson::doc! { "ping": 1 }, None),
        )
        .await
        .context("mongodb ping timeout")?
        .context("mongodb ping")?;

        tracing::debug!("setting up collections");

        tokio::time::timeout(DEFAULT_TIMEOUT, database::setup_collections(&database, &config))
            .await
            .context("collection setup timeout")?
            .context("collection setup")?;

        let generator = build_generator(config.generator);

        Ok(Self {
            config,
            database,
            generator,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &mongodb::Database {
        &self.database
    }

    pub fn generator(&self) -> &AnyGenerator {
        &self.generator
    }

    pub async fn healthy(&self) -> bool {
        if let Err(err) = self.database.run_command(bson::doc! { "ping": 1 }, None).await {
            tracing::error!("database ping failed: {err}");
            return false;
        }

        true
    }
}
