use dao_governance::GovernanceError;
use dao_resource::ResourceError;
use dao_timelock::TimelockError;
use dao_token::TokenError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Token setup failed: {0}")]
    Token(#[from] TokenError),

    #[error("Timelock setup failed: {0}")]
    Timelock(#[from] TimelockError),

    #[error("Governor setup failed: {0}")]
    Governance(#[from] GovernanceError),

    #[error("Resource setup failed: {0}")]
    Resource(#[from] ResourceError),
}

pub type Result<T> = std::result::Result<T, DeployError>;
