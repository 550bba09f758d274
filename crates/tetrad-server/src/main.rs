//! Tetrad game server.
//!
//! Configuration comes from the environment (see [`settings`]); log
//! verbosity from `RUST_LOG` (default `info`).

mod settings;

use tetrad::prelude::*;

use crate::settings::{Settings, SettingsError};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Server(#[from] TetradError),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        bind = %settings.bind,
        grace_secs = settings.rooms.grace_period.as_secs(),
        "starting tetrad"
    );

    let server = TetradServer::builder()
        .bind(&settings.bind)
        .room_config(settings.rooms)
        .build(TokenAuthenticator)
        .await?;
    server.run().await?;
    Ok(())
}
