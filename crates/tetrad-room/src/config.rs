//! Room manager configuration.

use std::time::Duration;

/// Settings for the room manager.
///
/// ```rust
/// use std::time::Duration;
/// use tetrad_room::RoomConfig;
///
/// let config = RoomConfig::default()
///     .with_grace_period(Duration::from_secs(30))
///     .with_code_seed(7);
/// assert_eq!(config.grace_period, Duration::from_secs(30));
/// assert_eq!(config.code_seed, Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How long a room with no attached connection survives before it is
    /// deleted. A join within this window keeps the room.
    pub grace_period: Duration,

    /// Seed for room-code generation. `None` seeds from the OS; tests pin
    /// it to get reproducible codes.
    pub code_seed: Option<u64>,

    /// Capacity of the manager actor's command channel. Senders wait
    /// when it is full.
    pub command_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(10),
            code_seed: None,
            command_capacity: 256,
        }
    }
}

impl RoomConfig {
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_code_seed(mut self, seed: u64) -> Self {
        self.code_seed = Some(seed);
        self
    }
}
