// Copyright (c) 2025 - Cowboy AI, Inc.
//! Membership Domain Events
//!
//! Successful admissions and departures are represented as immutable
//! events published to NATS for downstream consumers (attendee lists,
//! notifications). Events follow the usual conventions:
//! - Immutable facts, past tense naming (MemberJoined, not JoinMember)
//! - UUID v7 envelope id for time-ordering
//! - Carry a full member-set snapshot so consumers need no replay
//! - Serializable for transport

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EventId, UserId};
use crate::subjects::{membership_subject, MembershipOperation};

/// Membership domain events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A user was admitted to the event
    MemberJoined(MemberJoined),

    /// A user left the event
    MemberLeft(MemberLeft),
}

/// A user was admitted to the event's member set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberJoined {
    /// Unique event envelope id (UUID v7 for time-ordering)
    pub event_id: Uuid,

    /// When the admission was recorded
    pub occurred_at: DateTime<Utc>,

    /// Event the user joined
    pub event: EventId,

    /// Admitted user
    pub user: UserId,

    /// Member set after the admission
    pub members: Vec<UserId>,
}

/// A user left the event's member set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLeft {
    /// Unique event envelope id (UUID v7 for time-ordering)
    pub event_id: Uuid,

    /// When the departure was recorded
    pub occurred_at: DateTime<Utc>,

    /// Event the user left
    pub event: EventId,

    /// Departed user
    pub user: UserId,

    /// Member set after the departure
    pub members: Vec<UserId>,
}

impl MembershipEvent {
    /// Create a MemberJoined event
    pub fn joined(event: EventId, user: UserId, members: Vec<UserId>) -> Self {
        Self::MemberJoined(MemberJoined {
            event_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            event,
            user,
            members,
        })
    }

    /// Create a MemberLeft event
    pub fn left(event: EventId, user: UserId, members: Vec<UserId>) -> Self {
        Self::MemberLeft(MemberLeft {
            event_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            event,
            user,
            members,
        })
    }

    /// Event this membership change belongs to
    pub fn event(&self) -> &EventId {
        match self {
            MembershipEvent::MemberJoined(e) => &e.event,
            MembershipEvent::MemberLeft(e) => &e.event,
        }
    }

    /// NATS subject this event is published on
    pub fn subject(&self) -> String {
        match self {
            MembershipEvent::MemberJoined(e) => {
                membership_subject(&e.event, MembershipOperation::Joined)
            }
            MembershipEvent::MemberLeft(e) => {
                membership_subject(&e.event, MembershipOperation::Left)
            }
        }
    }
}
