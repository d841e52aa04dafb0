//! Setup wiring
//!
//! Deploys the four components in order and hands control to governance:
//! after `deploy` returns, the deployer holds no timelock role and the
//! governed resource answers only to the timelock.

use crate::config::DaoConfig;
use crate::error::Result;
use crate::facade::Dao;
use dao_core::{Address, Clock, EventSink};
use dao_governance::{GovernanceEngine, GovernorEvent};
use dao_resource::{GovernedResource, ResourceEvent, SharedResource};
use dao_timelock::{Role, TimelockEvent, TimelockExecutor};
use dao_token::{TokenEvent, VoteWeightToken};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Well-known identities of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoAddresses {
    pub deployer: Address,
    pub token: Address,
    pub governor: Address,
    pub timelock: Address,
    pub resource: Address,
}

impl DaoAddresses {
    /// Component addresses derived from the deployer, so separate
    /// deployments never collide
    pub fn derive(deployer: Address) -> Self {
        let at = |component: &str| Address::derive(&format!("{}/{}", deployer, component));
        Self {
            deployer,
            token: at("token"),
            governor: at("governor"),
            timelock: at("timelock"),
            resource: at("resource"),
        }
    }
}

pub fn deploy<S>(
    config: &DaoConfig,
    deployer: Address,
    clock: Arc<dyn Clock>,
    events: Arc<S>,
) -> Result<Dao>
where
    S: EventSink<TokenEvent>
        + EventSink<GovernorEvent>
        + EventSink<TimelockEvent>
        + EventSink<ResourceEvent>
        + 'static,
{
    config.validate()?;
    let addresses = DaoAddresses::derive(deployer);

    let token_events: Arc<dyn EventSink<TokenEvent>> = events.clone();
    let mut token = VoteWeightToken::new(
        config.token.name.clone(),
        config.token.symbol.clone(),
        deployer,
        clock.clone(),
        token_events,
    );
    token.mint(&deployer, &deployer, config.token.initial_supply)?;

    let timelock_events: Arc<dyn EventSink<TimelockEvent>> = events.clone();
    let mut timelock = TimelockExecutor::new(
        addresses.timelock,
        config.timelock.min_delay,
        &[],
        &[],
        Some(deployer),
        clock.clone(),
        timelock_events,
    );

    let governor_events: Arc<dyn EventSink<GovernorEvent>> = events.clone();
    let engine = GovernanceEngine::new(
        addresses.governor,
        config.governor.name.clone(),
        config.governor.settings,
        clock.clone(),
        governor_events,
    )?
    .with_cancellers(config.governor.cancellers.iter().copied());

    timelock.grant_role(&deployer, Role::Proposer, &addresses.governor)?;
    for proposer in &config.timelock.proposers {
        timelock.grant_role(&deployer, Role::Proposer, proposer)?;
    }
    for executor in &config.timelock.executors {
        timelock.grant_role(&deployer, Role::Executor, executor)?;
    }
    timelock.revoke_role(&deployer, Role::Admin, &deployer)?;

    let resource_events: Arc<dyn EventSink<ResourceEvent>> = events;
    let resource = SharedResource::new(GovernedResource::new(deployer, resource_events));
    if !config.resource.initial_value.is_empty() {
        resource.set_value(&deployer, config.resource.initial_value.clone())?;
    }
    resource.transfer_ownership(&deployer, &addresses.timelock)?;
    timelock.register_target(addresses.resource, Arc::new(resource.clone()));

    tracing::info!(
        deployer = %deployer,
        governor = %addresses.governor,
        timelock = %addresses.timelock,
        resource = %addresses.resource,
        supply = config.token.initial_supply,
        "dao_deployed"
    );
    Ok(Dao::new(addresses, token, engine, timelock, resource, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DaoEvent;
    use dao_core::{EventLog, ManualClock};

    #[test]
    fn test_addresses_are_distinct() {
        let a = DaoAddresses::derive(Address::derive("alice"));
        let b = DaoAddresses::derive(Address::derive("bob"));
        assert_ne!(a.timelock, b.timelock);
        assert_ne!(a.token, a.governor);
        assert_ne!(a.timelock, a.resource);
    }

    #[test]
    fn test_deploy_hands_off_control() {
        let deployer = Address::derive("deployer");
        let events = Arc::new(EventLog::<DaoEvent>::new());
        let dao = deploy(
            &DaoConfig::default(),
            deployer,
            Arc::new(ManualClock::new(1)),
            events.clone(),
        )
        .unwrap();
        let addrs = dao.addresses();

        assert_eq!(dao.balance_of(&deployer), 100_000);
        assert_eq!(dao.resource_owner(), addrs.timelock);
        assert!(!dao.has_role(Role::Admin, &deployer));
        assert!(dao.has_role(Role::Admin, &addrs.timelock));
        assert!(dao.has_role(Role::Proposer, &addrs.governor));
        assert!(dao.has_role(Role::Executor, &Address::derive("anyone")));
        assert!(!dao.has_role(Role::Proposer, &deployer));

        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e, DaoEvent::Timelock(TimelockEvent::RoleRevoked { .. }))));
    }

    #[test]
    fn test_initial_value() {
        let mut config = DaoConfig::default();
        config.resource.initial_value = "Julius Novachrono".to_string();
        let dao = deploy(
            &config,
            Address::derive("deployer"),
            Arc::new(ManualClock::new(1)),
            Arc::new(dao_core::NoopSink),
        )
        .unwrap();
        assert_eq!(dao.get_value(), "Julius Novachrono");
    }

    #[test]
    fn test_configured_executors_only() {
        let (alice, bob) = (Address::derive("alice"), Address::derive("bob"));
        let mut config = DaoConfig::default();
        config.timelock.executors = vec![alice];
        config.timelock.proposers = vec![bob];
        let dao = deploy(
            &config,
            Address::derive("deployer"),
            Arc::new(ManualClock::new(1)),
            Arc::new(dao_core::NoopSink),
        )
        .unwrap();

        assert!(dao.has_role(Role::Executor, &alice));
        assert!(!dao.has_role(Role::Executor, &bob));
        assert!(!dao.has_role(Role::Executor, &Address::ZERO));
        assert!(dao.has_role(Role::Proposer, &bob));
        assert!(dao.has_role(Role::Proposer, &dao.addresses().governor));
    }
}
