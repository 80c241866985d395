// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for membership events
//!
//! Defines the semantic subject patterns used for membership event routing.
//!
//! # Subject Pattern
//!
//! All membership events follow the hierarchical pattern:
//!
//! ```text
//! rsvp.membership.{event}.{operation}
//! ```
//!
//! This allows for:
//! - Precise subscriptions (`rsvp.membership.launch-party.joined`)
//! - Per-event wildcards (`rsvp.membership.launch-party.>`)
//! - Global subscriptions (`rsvp.membership.>`)

use std::fmt;

use crate::domain::EventId;

/// Root namespace for all RSVP subjects
pub const RSVP_ROOT: &str = "rsvp";

/// Membership aggregate segment
pub const MEMBERSHIP_SEGMENT: &str = "membership";

/// Membership operations (event types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipOperation {
    /// A user was admitted to the event
    Joined,
    /// A user left the event
    Left,
}

impl fmt::Display for MembershipOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipOperation::Joined => write!(f, "joined"),
            MembershipOperation::Left => write!(f, "left"),
        }
    }
}

/// Subject for a specific membership operation on one event
///
/// Format: `rsvp.membership.{event}.{operation}`
pub fn membership_subject(event: &EventId, operation: MembershipOperation) -> String {
    format!("{RSVP_ROOT}.{MEMBERSHIP_SEGMENT}.{event}.{operation}")
}

/// Wildcard subscription for all membership events of one event
///
/// Format: `rsvp.membership.{event}.>`
pub fn event_wildcard(event: &EventId) -> String {
    format!("{RSVP_ROOT}.{MEMBERSHIP_SEGMENT}.{event}.>")
}

/// Subscription for all membership events
///
/// Format: `rsvp.membership.>`
pub fn all_membership_events() -> String {
    format!("{RSVP_ROOT}.{MEMBERSHIP_SEGMENT}.>")
}
