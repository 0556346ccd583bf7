//! Kahuna app: wires the core state machine to the engine for an embedding host.
mod config;
mod effects;
mod session;

pub use config::{AppConfig, ConfigError};
pub use effects::EffectRunner;
pub use session::{Session, SessionError};

/// Install the global logger described by `config`.
pub fn init_logging(config: &AppConfig) -> Result<bool, ConfigError> {
    let level = config.log_level()?;
    Ok(kahuna_logging::initialize(&config.log_targets(), level))
}
