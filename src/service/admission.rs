// Copyright (c) 2025 - Cowboy AI, Inc.
//! Admission Controller
//!
//! Implements `Join` and `Leave` on top of [`MembershipStore`], encodes
//! the admission predicate, classifies failures, and returns typed
//! outcomes to the request-handling layer.
//!
//! # Control Flow
//!
//! ```text
//! Join → ConditionalAdd ──applied──→ Admitted
//!              │
//!           rejected → diagnostic Read → EventNotFound
//!                                      | AlreadyMember
//!                                      | CapacityExceeded
//!                                      | AdmissionRejected
//! ```
//!
//! # Transaction Semantics
//!
//! Each call is exactly one atomic store attempt:
//! 1. `Join` issues one conditional add; on rejection, one diagnostic
//!    read purely to choose the wording of the refusal
//! 2. `Leave` issues one unconditional remove and always succeeds
//!
//! No locks are held across round trips, and the controller never retries
//! a rejected admission; re-submission is caller policy. A rejected join
//! therefore has bounded latency and no partial effects.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::admission::{admission_predicate, classify_rejection, JoinRefusal};
use crate::domain::{EventId, UserId};
use crate::errors::StoreResult;
use crate::events::MembershipEvent;
use crate::nats::MembershipPublisher;
use crate::store::{ConditionalAdd, MembershipStore};

/// Outcome of a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// User was admitted; carries the member set after admission
    Admitted {
        /// Members after the admission, insertion order
        members: Vec<UserId>,
    },

    /// User was not admitted; carries the classified reason
    Refused(JoinRefusal),
}

/// Outcome of a leave request
///
/// Leaving always succeeds for the caller, whether or not the user was a
/// member and whether or not the event still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Members after the departure, insertion order
    pub members: Vec<UserId>,
}

/// Admission service interface
///
/// `Err` is reserved for infrastructure failures (store unreachable,
/// timeout); every anticipated outcome of contention is a typed `Ok`
/// value. A failed join never corrupts subsequent calls for other users
/// or events.
#[async_trait]
pub trait AdmissionService: Send + Sync {
    /// Attempt to admit a user to an event
    async fn join(&self, event_id: &EventId, user_id: &UserId) -> StoreResult<JoinOutcome>;

    /// Remove a user from an event (idempotent)
    async fn leave(&self, event_id: &EventId, user_id: &UserId) -> StoreResult<LeaveOutcome>;
}

/// Store-backed admission service
///
/// Generic over the membership store so the same controller runs against
/// the JetStream KV bucket in production and the in-memory store in
/// tests. Optionally publishes membership events after each applied
/// mutation.
pub struct StoreAdmissionService<S: MembershipStore> {
    /// Backing membership store
    store: S,

    /// Optional post-mutation event publisher
    publisher: Option<MembershipPublisher>,
}

impl<S: MembershipStore> StoreAdmissionService<S> {
    /// Create a service without event publishing
    pub fn new(store: S) -> Self {
        Self {
            store,
            publisher: None,
        }
    }

    /// Attach a membership event publisher
    pub fn with_publisher(mut self, publisher: MembershipPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Access the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish a membership event, best-effort
    ///
    /// The store mutation is already durable; a publish failure is logged
    /// and must never un-admit a member or fail the caller's request.
    async fn notify(&self, event: MembershipEvent) {
        let Some(publisher) = &self.publisher else {
            return;
        };

        if let Err(e) = publisher.publish(&event).await {
            warn!(subject = %event.subject(), error = %e, "Failed to publish membership event");
        }
    }
}

#[async_trait]
impl<S: MembershipStore> AdmissionService for StoreAdmissionService<S> {
    async fn join(&self, event_id: &EventId, user_id: &UserId) -> StoreResult<JoinOutcome> {
        let outcome = self
            .store
            .conditional_add(event_id, user_id, &|record| {
                admission_predicate(record, user_id)
            })
            .await?;

        match outcome {
            ConditionalAdd::Applied(record) => {
                info!(
                    event = %event_id,
                    user = %user_id,
                    members = record.members.len(),
                    capacity = %record.capacity,
                    "User admitted"
                );

                self.notify(MembershipEvent::joined(
                    event_id.clone(),
                    user_id.clone(),
                    record.members.clone(),
                ))
                .await;

                Ok(JoinOutcome::Admitted {
                    members: record.members,
                })
            }
            ConditionalAdd::Rejected => {
                // One diagnostic read to classify the refusal. Best-effort:
                // a concurrent join or leave may have changed state again,
                // which affects wording only, never the stored invariant.
                let snapshot = self.store.read(event_id).await?;
                let refusal = classify_rejection(snapshot.as_ref(), user_id);

                debug!(event = %event_id, user = %user_id, reason = %refusal, "Join refused");
                Ok(JoinOutcome::Refused(refusal))
            }
        }
    }

    async fn leave(&self, event_id: &EventId, user_id: &UserId) -> StoreResult<LeaveOutcome> {
        let members = match self.store.remove(event_id, user_id).await? {
            Some(record) => {
                debug!(
                    event = %event_id,
                    user = %user_id,
                    members = record.members.len(),
                    "User left"
                );

                self.notify(MembershipEvent::left(
                    event_id.clone(),
                    user_id.clone(),
                    record.members.clone(),
                ))
                .await;

                record.members
            }
            // Ghost event: the caller-visible effect ("I am not in the
            // list") already holds.
            None => Vec::new(),
        };

        Ok(LeaveOutcome { members })
    }
}
