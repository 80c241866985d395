// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Admission Invariants
//!
//! This test suite uses proptest to verify the invariants that must hold
//! for all valid join/leave sequences: the member set never exceeds
//! capacity, never contains duplicates, and every outcome matches what a
//! sequential model of the event would produce.

use std::collections::HashSet;

use proptest::prelude::*;

use rsvp_admission::domain::{Capacity, EventId, JoinRefusal, MembershipRecord, UserId};
use rsvp_admission::service::{AdmissionService, JoinOutcome, StoreAdmissionService};
use rsvp_admission::store::{MembershipStore, MemoryMembershipStore};

const USER_POOL: usize = 8;

fn users() -> Vec<UserId> {
    (0..USER_POOL)
        .map(|i| UserId::new(format!("user-{i}")).unwrap())
        .collect()
}

fn assert_invariants(members: &[UserId], capacity: u32) -> Result<(), TestCaseError> {
    prop_assert!(members.len() <= capacity as usize);

    let unique: HashSet<_> = members.iter().collect();
    prop_assert_eq!(unique.len(), members.len());

    Ok(())
}

proptest! {
    /// Every join/leave outcome matches a naive sequential model of the
    /// event, and the stored record satisfies the invariants after each
    /// step
    #[test]
    fn test_admission_matches_sequential_model(
        capacity in 1u32..6,
        ops in prop::collection::vec((0..USER_POOL, any::<bool>()), 1..64),
    ) {
        let users = users();

        tokio_test::block_on(async move {
            let svc = StoreAdmissionService::new(MemoryMembershipStore::new());
            let id = EventId::new("model-event").unwrap();
            svc.store()
                .create(&id, Capacity::new(capacity).unwrap())
                .await
                .unwrap();

            let mut model: Vec<UserId> = Vec::new();

            for (index, is_join) in ops {
                let user = &users[index];

                if is_join {
                    let outcome = svc.join(&id, user).await.unwrap();

                    let expected = if model.contains(user) {
                        JoinOutcome::Refused(JoinRefusal::AlreadyMember)
                    } else if model.len() >= capacity as usize {
                        JoinOutcome::Refused(JoinRefusal::CapacityExceeded)
                    } else {
                        model.push(user.clone());
                        JoinOutcome::Admitted {
                            members: model.clone(),
                        }
                    };

                    prop_assert_eq!(outcome, expected);
                } else {
                    let outcome = svc.leave(&id, user).await.unwrap();
                    model.retain(|member| member != user);
                    prop_assert_eq!(&outcome.members, &model);
                }

                let record = svc.store().read(&id).await.unwrap().unwrap();
                prop_assert_eq!(&record.members, &model);
                assert_invariants(&record.members, capacity)?;
            }

            Ok(())
        })?;
    }

    /// Leaving twice in a row always produces the same member set as
    /// leaving once, regardless of prior history
    #[test]
    fn test_leave_is_idempotent(
        capacity in 1u32..6,
        joins in prop::collection::vec(0..USER_POOL, 0..16),
        leaver in 0..USER_POOL,
    ) {
        let users = users();

        tokio_test::block_on(async move {
            let svc = StoreAdmissionService::new(MemoryMembershipStore::new());
            let id = EventId::new("idempotent-event").unwrap();
            svc.store()
                .create(&id, Capacity::new(capacity).unwrap())
                .await
                .unwrap();

            for index in joins {
                svc.join(&id, &users[index]).await.unwrap();
            }

            let once = svc.leave(&id, &users[leaver]).await.unwrap();
            let twice = svc.leave(&id, &users[leaver]).await.unwrap();

            prop_assert_eq!(once, twice);
            Ok(())
        })?;
    }

    /// The pure record mutations preserve capacity and uniqueness for
    /// arbitrary operation sequences
    #[test]
    fn test_record_mutations_preserve_invariants(
        capacity in 1u32..10,
        ops in prop::collection::vec((0..USER_POOL, any::<bool>()), 0..48),
    ) {
        let users = users();
        let mut record = MembershipRecord::new(
            EventId::new("pure-event").unwrap(),
            Capacity::new(capacity).unwrap(),
        );

        for (index, is_join) in ops {
            let user = &users[index];

            if is_join {
                match record.with_member(user.clone()) {
                    Ok(updated) => {
                        prop_assert!(!record.is_member(user));
                        prop_assert!(!record.is_full());
                        record = updated;
                        prop_assert!(record.is_member(user));
                    }
                    Err(_) => {
                        // Refusals only happen for the two legitimate reasons
                        prop_assert!(record.is_member(user) || record.is_full());
                    }
                }
            } else {
                record = record.without_member(user);
                prop_assert!(!record.is_member(user));
            }

            assert_invariants(&record.members, capacity)?;
        }
    }
}
