use thiserror::Error;

use rng_core::error::RaidError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Raid(#[from] RaidError),

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}
