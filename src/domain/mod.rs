// Copyright (c) 2025 - Cowboy AI, Inc.
//! Membership Domain Models
//!
//! Core domain concepts for event admission: identifier value objects with
//! validation invariants, the per-event membership record, and the pure
//! admission rules the service layer evaluates against store state.
//!
//! # Value Objects with Invariants
//!
//! - [`EventId`] / [`UserId`] - validated opaque identifiers, safe as KV key segments
//! - [`Capacity`] - positive attendance limit
//! - [`MembershipRecord`] - capacity plus the current member set
//!
//! # Pure Functions
//!
//! All admission rules in [`admission`] are pure: no I/O, no clocks, no
//! mutation. The store evaluates them against the authoritative record as
//! part of its atomic conditional update.

pub mod admission;
pub mod identifier;
pub mod membership;

// Re-export value objects
pub use admission::{admission_predicate, classify_rejection, JoinRefusal};
pub use identifier::{EventId, IdentifierError, UserId};
pub use membership::{Capacity, CapacityError, MembershipRecord, RecordError};
