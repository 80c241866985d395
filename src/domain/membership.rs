// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Membership Record
//!
//! One record per event: the fixed attendance capacity and the current
//! member set. The record is the only shared mutable state in the system
//! and is mutated exclusively through the store's conditional primitives.
//!
//! # Invariants
//!
//! - `members.len() <= capacity` at every observable instant
//! - `members` contains no duplicate user identifier (set semantics; the
//!   physical storage is array-like and preserves insertion order for
//!   display only)
//!
//! All mutation helpers here are pure: they return a new record and never
//! touch I/O. Atomicity is the store's concern, not the record's.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::{EventId, UserId};

/// Capacity validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Capacity must be a positive integer")]
    Zero,
}

/// Attendance capacity value object
///
/// Set at event creation and immutable thereafter. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(u32);

impl Capacity {
    /// Create a new capacity, rejecting zero
    pub fn new(limit: u32) -> Result<Self, CapacityError> {
        if limit == 0 {
            return Err(CapacityError::Zero);
        }
        Ok(Self(limit))
    }

    /// Get the capacity as a plain integer
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error from a pure record mutation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// User is already in the member set
    #[error("User {0} is already a member")]
    AlreadyMember(UserId),

    /// Member set is at capacity
    #[error("Event {event} is at capacity {capacity}")]
    AtCapacity { event: EventId, capacity: u32 },
}

/// Durable membership record for one event
///
/// Serialized as JSON for the KV payload. `members` preserves insertion
/// order; ordering carries no semantic weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    /// Event this record belongs to
    pub event_id: EventId,

    /// Fixed attendance capacity
    pub capacity: Capacity,

    /// Currently admitted members
    pub members: Vec<UserId>,
}

impl MembershipRecord {
    /// Create a fresh record with an empty member set
    pub fn new(event_id: EventId, capacity: Capacity) -> Self {
        Self {
            event_id,
            capacity,
            members: Vec::new(),
        }
    }

    /// Whether the user is currently a member
    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Whether the member set is at capacity
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity.get() as usize
    }

    /// Remaining open slots
    pub fn remaining(&self) -> u32 {
        (self.capacity.get() as usize).saturating_sub(self.members.len()) as u32
    }

    /// Whether the user would be admitted right now
    ///
    /// This is the admission predicate: not already a member, and a slot
    /// is open.
    pub fn admits(&self, user: &UserId) -> bool {
        !self.is_member(user) && !self.is_full()
    }

    /// Return a new record with the user admitted
    ///
    /// Fails rather than violate the uniqueness or capacity invariant;
    /// the member set never partially applies.
    pub fn with_member(&self, user: UserId) -> Result<Self, RecordError> {
        if self.is_member(&user) {
            return Err(RecordError::AlreadyMember(user));
        }

        if self.is_full() {
            return Err(RecordError::AtCapacity {
                event: self.event_id.clone(),
                capacity: self.capacity.get(),
            });
        }

        let mut updated = self.clone();
        updated.members.push(user);
        Ok(updated)
    }

    /// Return a new record with the user removed
    ///
    /// A no-op if the user is not a member (idempotent).
    pub fn without_member(&self, user: &UserId) -> Self {
        let mut updated = self.clone();
        updated.members.retain(|member| member != user);
        updated
    }
}
