use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api;
use crate::auth::TokenKeys;
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::facade::Facade;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let Action::Server { port, dsn } = action;

    let keys = Arc::new(TokenKeys::new(
        &globals.jwt_secret,
        globals.access_ttl_seconds,
        globals.refresh_ttl_seconds,
    ));

    let facade = match dsn {
        Some(dsn) => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(&dsn)
                .await
                .context("Failed to connect to database")?;
            Arc::new(Facade::postgres(pool))
        }
        None => {
            info!("No DSN given, serving from in-memory stores");
            Arc::new(Facade::in_memory())
        }
    };

    api::serve(port, facade, keys).await
}
