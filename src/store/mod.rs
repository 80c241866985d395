// Copyright (c) 2025 - Cowboy AI, Inc.
//! Membership Store Abstraction
//!
//! This module defines the storage interface for event membership records
//! and its implementations.
//!
//! # Architecture
//!
//! ```text
//! Join/Leave → AdmissionService → MembershipStore → KV bucket
//!                                       ↓
//!                            conditional add (CAS)
//! ```
//!
//! # Store Requirements
//!
//! 1. **Atomic Conditional Add**: the admission predicate is evaluated
//!    against the current stored record as part of the same atomic step
//!    that applies the write; no caller-visible window exists between
//!    check and apply
//! 2. **Atomic Remove**: readers never observe a torn member set
//! 3. **Linearizable per record**: applied operations on one event admit
//!    some total order consistent with real time
//! 4. **No application locks**: the guarantee comes from the backing
//!    store's native conditional update, so it holds across independent
//!    server processes
//!
//! # Example
//!
//! ```rust,no_run
//! use rsvp_admission::store::{MembershipStore, NatsKvMembershipStore};
//! use rsvp_admission::domain::{Capacity, EventId, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = NatsKvMembershipStore::connect("nats://localhost:4222").await?;
//!
//!     let event = EventId::new("launch-party")?;
//!     let alice = UserId::new("alice")?;
//!
//!     store.create(&event, Capacity::new(50)?).await?;
//!     let outcome = store
//!         .conditional_add(&event, &alice, &|record| record.admits(&alice))
//!         .await?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::domain::{Capacity, EventId, MembershipRecord, UserId};
use crate::errors::StoreResult;

pub mod memory;
pub mod nats_kv;

pub use memory::MemoryMembershipStore;
pub use nats_kv::{MembershipBucketConfig, NatsKvMembershipStore};

/// Predicate evaluated against the current stored record inside the
/// store's atomic conditional-add step
pub type AdmissionPredicate<'a> = &'a (dyn Fn(&MembershipRecord) -> bool + Send + Sync);

/// Result of a conditional add: either the mutation applied and the new
/// record is returned, or the store rejected it without mutating anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalAdd {
    /// Predicate held and the user was admitted; carries the new record
    Applied(MembershipRecord),

    /// Predicate failed, the record does not exist, or a concurrent
    /// writer changed the record first. No mutation was performed.
    Rejected,
}

/// Durable, atomically-mutable storage for membership records
///
/// Implementations must provide linearizability per event record via the
/// backing store's native conditional-update facility. Every mutation is
/// a single atomic attempt; the store never retries an admission decision
/// on the caller's behalf.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Create the membership record for a new event with an empty member set
    ///
    /// Collaborator surface for the event directory. Fails with
    /// `StoreError::AlreadyExists` if a live record is present.
    async fn create(&self, event_id: &EventId, capacity: Capacity)
        -> StoreResult<MembershipRecord>;

    /// Atomically add `user_id` to the member set if `predicate` holds
    /// against the current record
    ///
    /// Returns `Rejected` when the predicate fails against the current
    /// record or when the record does not exist; both leave the record
    /// untouched. Exactly one admission decision per call: a predicate
    /// verdict is final and implementations never re-try it, they only
    /// re-drive the underlying compare-and-swap as needed to realize the
    /// indivisible check-and-apply.
    async fn conditional_add(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        predicate: AdmissionPredicate<'_>,
    ) -> StoreResult<ConditionalAdd>;

    /// Unconditionally remove `user_id` from the member set
    ///
    /// A no-op if the user is absent (still returns the current record);
    /// `None` if the record does not exist. Atomic with respect to
    /// concurrent `conditional_add`/`remove` calls on the same record.
    async fn remove(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> StoreResult<Option<MembershipRecord>>;

    /// Plain snapshot read, used only for diagnostics
    async fn read(&self, event_id: &EventId) -> StoreResult<Option<MembershipRecord>>;

    /// Destroy the membership record (event deletion)
    ///
    /// Idempotent; deleting an absent record succeeds. Safe to race with
    /// in-flight joins, which then observe a rejected write.
    async fn delete(&self, event_id: &EventId) -> StoreResult<()>;
}
