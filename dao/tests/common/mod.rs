#![allow(dead_code)]

use dao::{
    deploy, encode_call, Address, Dao, DaoConfig, DaoEvent, EventLog, Hash32, ManualClock,
    ResourceCall, VoteType,
};
use std::sync::Arc;

pub struct Harness {
    pub dao: Dao,
    pub clock: Arc<ManualClock>,
    pub events: Arc<EventLog<DaoEvent>>,
    pub deployer: Address,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn harness() -> Harness {
    harness_with(DaoConfig::default())
}

pub fn harness_with(config: DaoConfig) -> Harness {
    init_tracing();
    let clock = Arc::new(ManualClock::new(1));
    let events = Arc::new(EventLog::<DaoEvent>::new());
    let deployer = Address::derive("deployer");
    let dao = deploy(&config, deployer, clock.clone(), events.clone()).expect("deploy");
    Harness {
        dao,
        clock,
        events,
        deployer,
    }
}

pub fn store_call(value: &str) -> Vec<u8> {
    encode_call(&ResourceCall::SetValue {
        value: value.to_string(),
    })
    .expect("encode")
}

impl Harness {
    /// Proposal that sets the governed value
    pub fn propose_store(&self, proposer: &Address, value: &str) -> Hash32 {
        self.dao
            .propose(
                proposer,
                vec![self.dao.addresses().resource],
                vec![0],
                vec![store_call(value)],
                &format!("Store {} in the box", value),
            )
            .expect("propose")
    }

    /// Give `amount` of the deployer's tokens to `account` and self-delegate
    pub fn fund(&self, account: &Address, amount: u64) {
        self.dao.transfer(&self.deployer, account, amount).expect("transfer");
        self.dao.delegate(account, account).expect("delegate");
    }

    /// Drive a proposal from creation through a passing vote to Queued
    pub fn pass_and_queue(&self, id: &Hash32) -> u64 {
        self.clock.advance(1);
        self.dao
            .cast_vote(&self.deployer, id, VoteType::For)
            .expect("vote");
        self.clock.advance(6);
        self.dao.queue(id).expect("queue")
    }
}
