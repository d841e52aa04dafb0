//! Deployment configuration
//!
//! ```toml
//! [token]
//! name = "GovernanceToken"
//! symbol = "GT"
//! initial_supply = 100000
//!
//! [governor]
//! voting_delay = 1
//! voting_period = 5
//! quorum_percentage = 4
//!
//! [timelock]
//! min_delay = 3600
//! proposers = []
//! executors = ["0x0000000000000000000000000000000000000000"]
//! ```
//!
//! Every field is optional; missing ones take the defaults shown.

use crate::error::{DeployError, Result};
use dao_core::Address;
use dao_governance::GovernorSettings;
use dao_timelock::DEFAULT_MIN_DELAY;
use dao_token::INITIAL_SUPPLY;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaoConfig {
    pub token: TokenConfig,
    pub governor: GovernorConfig,
    pub timelock: TimelockConfig,
    pub resource: ResourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Minted to the deployer
    pub initial_supply: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "GovernanceToken".to_string(),
            symbol: "GT".to_string(),
            initial_supply: INITIAL_SUPPLY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    pub name: String,
    #[serde(flatten)]
    pub settings: GovernorSettings,
    /// Accounts allowed to cancel any Pending or Active proposal
    pub cancellers: Vec<Address>,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            name: "GovernorContract".to_string(),
            settings: GovernorSettings::default(),
            cancellers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelockConfig {
    pub min_delay: u64,
    /// Scheduling accounts in addition to the governor
    pub proposers: Vec<Address>,
    /// Accounts allowed to run ready operations. The zero address opens
    /// execution to everyone.
    pub executors: Vec<Address>,
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            proposers: Vec::new(),
            executors: vec![Address::ZERO],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Value stored before ownership passes to the timelock
    pub initial_value: String,
}

impl DaoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DeployError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DaoConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.name.is_empty() || self.token.symbol.is_empty() {
            return Err(DeployError::InvalidConfig(
                "token name and symbol must not be empty".to_string(),
            ));
        }
        if self.governor.cancellers.iter().any(Address::is_zero) {
            return Err(DeployError::InvalidConfig(
                "zero address cannot be a canceller".to_string(),
            ));
        }
        if self.timelock.executors.is_empty() {
            return Err(DeployError::InvalidConfig(
                "timelock needs at least one executor".to_string(),
            ));
        }
        self.governor
            .settings
            .validate()
            .map_err(|e| DeployError::InvalidConfig(e.to_string()))
    }
}
