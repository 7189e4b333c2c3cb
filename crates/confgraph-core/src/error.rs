use thiserror::Error;

/// Errors raised while normalizing, planning or configuring a load.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Record has no session identifier")]
    MissingSessionId,
}
