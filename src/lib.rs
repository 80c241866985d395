//! Capacity-bounded RSVP admission for events
//!
//! This crate implements a duplicate-free membership service: given an event
//! with a fixed attendance capacity, it decides under concurrent requests
//! whether a user may join, without ever letting the attendee count exceed
//! capacity and without ever admitting the same user twice.
//!
//! The only synchronization primitive is the backing store's native
//! compare-and-swap (a revision-checked NATS JetStream KV update), so the
//! guarantees hold across independent server processes sharing the bucket.

pub mod domain;
pub mod errors;
pub mod events;
pub mod nats;
pub mod service;
pub mod store;
pub mod subjects;

// Re-export commonly used types
pub use domain::{Capacity, EventId, JoinRefusal, MembershipRecord, UserId};
pub use errors::{StoreError, StoreResult};
pub use nats::{MembershipPublisher, NatsClient, NatsConfig};
pub use service::{AdmissionService, JoinOutcome, LeaveOutcome, StoreAdmissionService};
pub use store::{
    ConditionalAdd, MembershipBucketConfig, MembershipStore, MemoryMembershipStore,
    NatsKvMembershipStore,
};
