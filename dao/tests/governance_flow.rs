mod common;

use common::{harness, harness_with, store_call};
use dao::{
    Address, Clock, DaoConfig, DaoEvent, GovernanceError, ProposalState, TokenError, VoteType,
};
use dao_governance::GovernorEvent;
use dao_resource::ResourceEvent;

#[test]
fn test_self_delegation_activates_power() {
    let h = harness();
    assert_eq!(h.dao.get_votes(&h.deployer), 0);
    assert_eq!(h.dao.delegates(&h.deployer), None);

    let balance = h.dao.balance_of(&h.deployer);
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    assert_eq!(h.dao.get_votes(&h.deployer), balance);
    assert_eq!(h.dao.delegates(&h.deployer), Some(h.deployer));

    assert_eq!(
        h.dao.delegate(&h.deployer, &Address::ZERO).unwrap_err(),
        TokenError::InvalidDelegate(Address::ZERO)
    );
}

#[test]
fn test_yami_sukehiro_end_to_end() {
    let h = harness();
    assert_eq!(h.dao.total_supply(), 100_000);
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);

    let id = h.propose_store(&h.deployer, "Yami Sukehiro");
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Pending);

    h.clock.advance(1);
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Active);
    let weight = h
        .dao
        .cast_vote_with_reason(&h.deployer, &id, VoteType::For, "the captain")
        .unwrap();
    assert_eq!(weight, 100_000);

    h.clock.advance(5 + 1);
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Succeeded);

    let eta = h.dao.queue(&id).unwrap();
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Queued);
    assert_eq!(eta, h.clock.now() + 3600);

    let executor = Address::derive("anyone");
    assert!(matches!(
        h.dao.execute(&executor, &id),
        Err(GovernanceError::TimelockNotReady { .. })
    ));
    assert_eq!(h.dao.get_value(), "");

    h.clock.advance(3600);
    h.dao.execute(&executor, &id).unwrap();
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Executed);
    assert_eq!(h.dao.get_value(), "Yami Sukehiro");

    let events = h.events.events();
    assert!(events.contains(&DaoEvent::Resource(ResourceEvent::ValueChanged {
        previous: String::new(),
        value: "Yami Sukehiro".to_string(),
    })));
    assert!(events.contains(&DaoEvent::Governor(GovernorEvent::ProposalStateChanged {
        id,
        state: ProposalState::Executed,
    })));
}

#[test]
fn test_state_never_regresses() {
    let h = harness();
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);
    let passing = h.propose_store(&h.deployer, "Asta");
    let failing = h.propose_store(&h.deployer, "Yuno");

    let rank = |s: ProposalState| match s {
        ProposalState::Pending => 0,
        ProposalState::Active => 1,
        ProposalState::Succeeded | ProposalState::Defeated => 2,
        ProposalState::Queued => 3,
        ProposalState::Executed => 4,
        ProposalState::Canceled => 5,
    };

    let mut last = (0, 0);
    let mut seen_final = None;
    for tick in 0..12 {
        if tick == 1 {
            h.dao.cast_vote(&h.deployer, &passing, VoteType::For).unwrap();
            h.dao.cast_vote(&h.deployer, &failing, VoteType::Against).unwrap();
        }
        let a = h.dao.state(&passing).unwrap();
        let b = h.dao.state(&failing).unwrap();
        assert!(rank(a) >= last.0 && rank(b) >= last.1, "regressed at tick {}", tick);
        last = (rank(a), rank(b));
        if rank(b) == 2 {
            assert_eq!(*seen_final.get_or_insert(b), b);
        }
        h.clock.advance(1);
    }
    assert_eq!(h.dao.state(&passing).unwrap(), ProposalState::Succeeded);
    assert_eq!(seen_final, Some(ProposalState::Defeated));
}

#[test]
fn test_double_vote_always_rejected() {
    let h = harness();
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);
    let id = h.propose_store(&h.deployer, "Noelle");
    h.clock.advance(1);

    h.dao.cast_vote(&h.deployer, &id, VoteType::Against).unwrap();
    for support in [VoteType::Against, VoteType::For, VoteType::Abstain] {
        assert_eq!(
            h.dao.cast_vote(&h.deployer, &id, support).unwrap_err(),
            GovernanceError::AlreadyVoted {
                id,
                voter: h.deployer
            }
        );
    }
    let votes = h.dao.proposal_votes(&id).unwrap();
    assert_eq!(votes.against_votes, 100_000);
    assert_eq!(votes.for_votes, 0);
    assert_eq!(h.dao.receipt(&id, &h.deployer).unwrap().support, VoteType::Against);
}

#[test]
fn test_quorum_boundary() {
    let h = harness();
    let (yes, no, meh) = (
        Address::derive("luck"),
        Address::derive("magna"),
        Address::derive("vanessa"),
    );
    h.fund(&yes, 1_500);
    h.fund(&no, 1_499);
    h.fund(&meh, 1_001);
    h.clock.advance(1);

    let exact = h.propose_store(&yes, "exact");
    let short = h.propose_store(&yes, "short");
    h.clock.advance(1);

    let snapshot = h.dao.proposal(&exact).unwrap().snapshot();
    assert_eq!(h.dao.quorum(snapshot).unwrap(), 4_000);

    // 1_500 + 1_499 + 1_001 = 4_000, exactly the quorum, For wins by one
    h.dao.cast_vote(&yes, &exact, VoteType::For).unwrap();
    h.dao.cast_vote(&no, &exact, VoteType::Against).unwrap();
    h.dao.cast_vote(&meh, &exact, VoteType::Abstain).unwrap();

    // 1_500 + 1_499 = 2_999, unanimous For but under quorum
    h.dao.cast_vote(&yes, &short, VoteType::For).unwrap();
    h.dao.cast_vote(&no, &short, VoteType::For).unwrap();

    h.clock.advance(5);
    assert_eq!(h.dao.state(&exact).unwrap(), ProposalState::Succeeded);
    assert_eq!(h.dao.state(&short).unwrap(), ProposalState::Defeated);
    assert!(matches!(
        h.dao.queue(&short),
        Err(GovernanceError::UnexpectedState {
            current: ProposalState::Defeated,
            ..
        })
    ));
}

#[test]
fn test_exact_quorum_succeeds_one_short_fails() {
    let h = harness();
    let (a, b) = (Address::derive("finral"), Address::derive("langris"));
    h.fund(&a, 4_000);
    h.fund(&b, 3_999);
    h.clock.advance(1);

    let exact = h.propose_store(&a, "exact");
    let short = h.propose_store(&b, "short");
    h.clock.advance(1);
    h.dao.cast_vote(&a, &exact, VoteType::For).unwrap();
    h.dao.cast_vote(&b, &short, VoteType::For).unwrap();
    h.clock.advance(5);

    assert_eq!(h.dao.state(&exact).unwrap(), ProposalState::Succeeded);
    assert_eq!(h.dao.state(&short).unwrap(), ProposalState::Defeated);
}

#[test]
fn test_votes_use_snapshot_balances() {
    let h = harness();
    let late = Address::derive("late");
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);
    let id = h.propose_store(&h.deployer, "Mimosa");
    h.clock.advance(1);

    // Funded after the snapshot: counted as a vote, but with zero weight
    h.fund(&late, 50_000);
    assert_eq!(h.dao.cast_vote(&late, &id, VoteType::Against).unwrap(), 0);
    assert_eq!(
        h.dao.cast_vote(&h.deployer, &id, VoteType::For).unwrap(),
        100_000
    );
    assert!(h.dao.has_voted(&id, &late));
}

#[test]
fn test_proposal_threshold_and_duplicates() {
    let mut config = DaoConfig::default();
    config.governor.settings.proposal_threshold = 10;
    let h = harness_with(config);

    let nobody = Address::derive("nobody");
    assert!(matches!(
        h.dao.propose(
            &nobody,
            vec![h.dao.addresses().resource],
            vec![0],
            vec![store_call("x")],
            "x"
        ),
        Err(GovernanceError::InsufficientProposerPower { power: 0, .. })
    ));

    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    let id = h.propose_store(&h.deployer, "Charmy");
    assert_eq!(
        h.dao
            .propose(
                &h.deployer,
                vec![h.dao.addresses().resource],
                vec![0],
                vec![store_call("Charmy")],
                "Store Charmy in the box"
            )
            .unwrap_err(),
        GovernanceError::DuplicateProposal(id)
    );
    assert_eq!(h.dao.proposals(0, 10).len(), 1);
}

#[test]
fn test_cancel_by_configured_canceller() {
    let guardian = Address::derive("guardian");
    let mut config = DaoConfig::default();
    config.governor.cancellers = vec![guardian];
    let h = harness_with(config);
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);

    let id = h.propose_store(&h.deployer, "Zora");
    h.clock.advance(1);
    assert_eq!(
        h.dao.cancel(&Address::derive("outsider"), &id).unwrap_err(),
        GovernanceError::Unauthorized(Address::derive("outsider"))
    );
    h.dao.cancel(&guardian, &id).unwrap();
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Canceled);

    h.clock.advance(10);
    assert_eq!(h.dao.state(&id).unwrap(), ProposalState::Canceled);
    assert!(matches!(
        h.dao.queue(&id),
        Err(GovernanceError::UnexpectedState {
            current: ProposalState::Canceled,
            ..
        })
    ));
}

#[test]
fn test_cancel_not_allowed_once_queued() {
    let h = harness();
    h.dao.delegate(&h.deployer, &h.deployer).unwrap();
    h.clock.advance(1);
    let id = h.propose_store(&h.deployer, "Gauche");
    h.pass_and_queue(&id);

    assert_eq!(
        h.dao.cancel(&h.deployer, &id).unwrap_err(),
        GovernanceError::AlreadyFinalized {
            id,
            state: ProposalState::Queued
        }
    );
}
