//! Process configuration read from the environment.
//!
//! | Variable            | Meaning                                   | Default        |
//! |---------------------|-------------------------------------------|----------------|
//! | `TETRAD_BIND`       | full listen address                       | `0.0.0.0:$PORT`|
//! | `PORT`              | listen port when `TETRAD_BIND` is unset   | `3000`         |
//! | `TETRAD_GRACE_SECS` | seconds an unattached room survives       | `10`           |

use std::time::Duration;

use tetrad::prelude::RoomConfig;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub rooms: RoomConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let bind = match lookup("TETRAD_BIND") {
            Some(bind) => bind,
            None => {
                let port = match lookup("PORT") {
                    Some(raw) => raw.trim().parse::<u16>().map_err(|_| SettingsError::Invalid {
                        name: "PORT",
                        expected: "a port number",
                        value: raw.clone(),
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let mut rooms = RoomConfig::default();
        if let Some(raw) = lookup("TETRAD_GRACE_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| SettingsError::Invalid {
                name: "TETRAD_GRACE_SECS",
                expected: "a whole number of seconds",
                value: raw.clone(),
            })?;
            rooms = rooms.with_grace_period(Duration::from_secs(secs));
        }

        Ok(Self { bind, rooms })
    }
}
