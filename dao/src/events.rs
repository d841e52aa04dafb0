use dao_governance::GovernorEvent;
use dao_resource::ResourceEvent;
use dao_timelock::TimelockEvent;
use dao_token::TokenEvent;
use serde::{Deserialize, Serialize};

/// Every event the deployed components emit, tagged by source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event")]
pub enum DaoEvent {
    Token(TokenEvent),
    Governor(GovernorEvent),
    Timelock(TimelockEvent),
    Resource(ResourceEvent),
}

impl From<TokenEvent> for DaoEvent {
    fn from(event: TokenEvent) -> Self {
        DaoEvent::Token(event)
    }
}

impl From<GovernorEvent> for DaoEvent {
    fn from(event: GovernorEvent) -> Self {
        DaoEvent::Governor(event)
    }
}

impl From<TimelockEvent> for DaoEvent {
    fn from(event: TimelockEvent) -> Self {
        DaoEvent::Timelock(event)
    }
}

impl From<ResourceEvent> for DaoEvent {
    fn from(event: ResourceEvent) -> Self {
        DaoEvent::Resource(event)
    }
}
