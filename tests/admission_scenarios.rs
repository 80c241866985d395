// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario tests for the admission service
//!
//! These tests verify the complete join/leave flow against the in-memory
//! store: admission, refusal classification, idempotent departure, and
//! the behavior around missing events.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use test_case::test_case;

use rsvp_admission::domain::{Capacity, EventId, JoinRefusal, UserId};
use rsvp_admission::service::{AdmissionService, JoinOutcome, LeaveOutcome, StoreAdmissionService};
use rsvp_admission::store::{MembershipStore, MemoryMembershipStore};

fn event(name: &str) -> EventId {
    EventId::new(name).unwrap()
}

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

async fn service_with_event(
    name: &str,
    capacity: u32,
) -> StoreAdmissionService<MemoryMembershipStore> {
    let svc = StoreAdmissionService::new(MemoryMembershipStore::new());
    svc.store()
        .create(&event(name), Capacity::new(capacity).unwrap())
        .await
        .unwrap();
    svc
}

/// Scenario A: capacity 1, two concurrent joins, exactly one winner
#[tokio::test]
async fn test_two_concurrent_joins_for_last_slot() {
    let svc = Arc::new(service_with_event("party", 1).await);
    let id = event("party");

    let alice_task = {
        let svc = Arc::clone(&svc);
        let id = id.clone();
        tokio::spawn(async move { svc.join(&id, &user("alice")).await.unwrap() })
    };
    let bob_task = {
        let svc = Arc::clone(&svc);
        let id = id.clone();
        tokio::spawn(async move { svc.join(&id, &user("bob")).await.unwrap() })
    };

    let outcomes = vec![alice_task.await.unwrap(), bob_task.await.unwrap()];

    let admitted: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, JoinOutcome::Admitted { .. }))
        .collect();
    let exceeded: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, JoinOutcome::Refused(JoinRefusal::CapacityExceeded)))
        .collect();

    assert_eq!(admitted.len(), 1);
    assert_eq!(exceeded.len(), 1);

    let record = svc.store().read(&id).await.unwrap().unwrap();
    assert_eq!(record.members.len(), 1);
    assert!(record.members[0] == user("alice") || record.members[0] == user("bob"));
}

/// Scenario B: joining twice refuses with AlreadyMember, members unchanged
#[tokio::test]
async fn test_repeat_join_refused_as_already_member() {
    let svc = service_with_event("meetup", 5).await;
    let id = event("meetup");

    let first = svc.join(&id, &user("alice")).await.unwrap();
    assert_eq!(
        first,
        JoinOutcome::Admitted {
            members: vec![user("alice")]
        }
    );

    let second = svc.join(&id, &user("alice")).await.unwrap();
    assert_eq!(second, JoinOutcome::Refused(JoinRefusal::AlreadyMember));

    let record = svc.store().read(&id).await.unwrap().unwrap();
    assert_eq!(record.members, vec![user("alice")]);
}

/// Scenario C: a slot freed by leave is immediately joinable
#[tokio::test]
async fn test_leave_frees_slot_for_next_join() {
    let svc = service_with_event("dinner", 3).await;
    let id = event("dinner");

    for name in ["alice", "bob", "carol"] {
        svc.join(&id, &user(name)).await.unwrap();
    }

    assert_eq!(
        svc.join(&id, &user("dave")).await.unwrap(),
        JoinOutcome::Refused(JoinRefusal::CapacityExceeded)
    );

    let left = svc.leave(&id, &user("bob")).await.unwrap();
    assert_eq!(
        left,
        LeaveOutcome {
            members: vec![user("alice"), user("carol")]
        }
    );

    let joined = svc.join(&id, &user("dave")).await.unwrap();
    assert_eq!(
        joined,
        JoinOutcome::Admitted {
            members: vec![user("alice"), user("carol"), user("dave")]
        }
    );
}

/// Scenario D: missing events refuse joins but never fail leaves
#[tokio::test]
async fn test_ghost_event_join_and_leave() {
    let svc = StoreAdmissionService::new(MemoryMembershipStore::new());
    let id = event("ghost-event");

    assert_eq!(
        svc.join(&id, &user("alice")).await.unwrap(),
        JoinOutcome::Refused(JoinRefusal::EventNotFound)
    );

    assert_eq!(
        svc.leave(&id, &user("alice")).await.unwrap(),
        LeaveOutcome { members: vec![] }
    );
}

/// Filling an event to capacity admits exactly `capacity` users and
/// refuses the next one, never truncating the member set
#[test_case(1; "capacity one")]
#[test_case(3; "capacity three")]
#[test_case(8; "capacity eight")]
#[tokio::test]
async fn test_fill_to_capacity_then_refuse(capacity: u32) {
    let svc = service_with_event("concert", capacity).await;
    let id = event("concert");

    for i in 0..capacity {
        let outcome = svc.join(&id, &user(&format!("user-{i}"))).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Admitted { .. }));
    }

    let outcome = svc.join(&id, &user("latecomer")).await.unwrap();
    assert_eq!(outcome, JoinOutcome::Refused(JoinRefusal::CapacityExceeded));

    let record = svc.store().read(&id).await.unwrap().unwrap();
    assert_eq!(record.members.len(), capacity as usize);
}

/// Leave is idempotent: the second call is a harmless no-op
#[tokio::test]
async fn test_leave_twice_same_result() {
    let svc = service_with_event("workshop", 4).await;
    let id = event("workshop");

    svc.join(&id, &user("alice")).await.unwrap();
    svc.join(&id, &user("bob")).await.unwrap();

    let once = svc.leave(&id, &user("alice")).await.unwrap();
    let twice = svc.leave(&id, &user("alice")).await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.members, vec![user("bob")]);
}

/// Deleting an event while users are joining refuses rather than
/// fabricating a member entry on a deleted record
#[tokio::test]
async fn test_join_after_delete_is_not_found() {
    let svc = service_with_event("cancelled", 10).await;
    let id = event("cancelled");

    svc.join(&id, &user("alice")).await.unwrap();
    svc.store().delete(&id).await.unwrap();

    assert_eq!(
        svc.join(&id, &user("bob")).await.unwrap(),
        JoinOutcome::Refused(JoinRefusal::EventNotFound)
    );
    assert_eq!(
        svc.leave(&id, &user("alice")).await.unwrap(),
        LeaveOutcome { members: vec![] }
    );
}
