// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Admission Rules
//!
//! The admission predicate and the rejection classifier. Both are pure
//! functions over record snapshots; the predicate is handed to the store
//! and evaluated as part of the same atomic step that applies the write.
//!
//! # Design Principles
//!
//! - **Pure Functions**: no I/O, no mutation, deterministic
//! - **Single Attempt**: classification never triggers a retry; it only
//!   selects the wording surfaced to the caller

use std::fmt;

use crate::domain::{MembershipRecord, UserId};

/// Typed reason a join request was refused
///
/// These are expected, user-facing outcomes of concurrent contention,
/// not infrastructure failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinRefusal {
    /// No membership record exists for the event
    EventNotFound,

    /// Caller is already in the member set (idempotency signal)
    AlreadyMember,

    /// Member set is at capacity
    CapacityExceeded,

    /// The conditional write failed but the diagnostic snapshot no longer
    /// explains why; state changed again in between
    AdmissionRejected,
}

impl fmt::Display for JoinRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinRefusal::EventNotFound => write!(f, "event not found"),
            JoinRefusal::AlreadyMember => write!(f, "already a member"),
            JoinRefusal::CapacityExceeded => write!(f, "capacity exceeded"),
            JoinRefusal::AdmissionRejected => write!(f, "admission rejected"),
        }
    }
}

/// Admission predicate for a join by `user`
///
/// Holds iff the user is not already a member and a slot is open. The
/// store evaluates this against the authoritative current record at the
/// instant of mutation; it must never be evaluated against a cached copy.
pub fn admission_predicate(record: &MembershipRecord, user: &UserId) -> bool {
    record.admits(user)
}

/// Classify a rejected join from a diagnostic snapshot
///
/// The snapshot is best-effort and may already be stale by the time the
/// refusal is reported; that only affects wording, never stored state.
pub fn classify_rejection(snapshot: Option<&MembershipRecord>, user: &UserId) -> JoinRefusal {
    let Some(record) = snapshot else {
        return JoinRefusal::EventNotFound;
    };

    if record.is_member(user) {
        return JoinRefusal::AlreadyMember;
    }

    if record.is_full() {
        return JoinRefusal::CapacityExceeded;
    }

    JoinRefusal::AdmissionRejected
}
