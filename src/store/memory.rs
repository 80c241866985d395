// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Membership Store
//!
//! Mutex-guarded implementation of [`MembershipStore`] for tests and local
//! development. Check-and-apply happens under a single lock acquisition,
//! giving the same linearizable-per-record contract the KV store provides
//! through revision-checked updates.
//!
//! Not suitable for production: the mutex covers one process only.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Capacity, EventId, MembershipRecord, UserId};
use crate::errors::{StoreError, StoreResult};
use crate::store::{AdmissionPredicate, ConditionalAdd, MembershipStore};

/// In-process membership store backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct MemoryMembershipStore {
    records: Mutex<HashMap<EventId, MembershipRecord>>,
}

impl MemoryMembershipStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<EventId, MembershipRecord>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::KeyValue("membership map mutex poisoned".to_string()))
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn create(
        &self,
        event_id: &EventId,
        capacity: Capacity,
    ) -> StoreResult<MembershipRecord> {
        let mut records = self.lock()?;

        if records.contains_key(event_id) {
            return Err(StoreError::AlreadyExists(event_id.to_string()));
        }

        let record = MembershipRecord::new(event_id.clone(), capacity);
        records.insert(event_id.clone(), record.clone());

        debug!(event = %event_id, %capacity, "Created membership record");
        Ok(record)
    }

    async fn conditional_add(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        predicate: AdmissionPredicate<'_>,
    ) -> StoreResult<ConditionalAdd> {
        let mut records = self.lock()?;

        let Some(record) = records.get(event_id) else {
            return Ok(ConditionalAdd::Rejected);
        };

        if !predicate(record) {
            return Ok(ConditionalAdd::Rejected);
        }

        // The record-level guards still apply even if a caller hands in a
        // laxer predicate; the invariants are the store's to protect.
        let updated = match record.with_member(user_id.clone()) {
            Ok(updated) => updated,
            Err(_) => return Ok(ConditionalAdd::Rejected),
        };

        records.insert(event_id.clone(), updated.clone());

        debug!(event = %event_id, user = %user_id, "Conditional add applied");
        Ok(ConditionalAdd::Applied(updated))
    }

    async fn remove(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> StoreResult<Option<MembershipRecord>> {
        let mut records = self.lock()?;

        let Some(record) = records.get(event_id) else {
            return Ok(None);
        };

        // No-op if the user is absent: nothing is written back.
        if !record.is_member(user_id) {
            return Ok(Some(record.clone()));
        }

        let updated = record.without_member(user_id);
        records.insert(event_id.clone(), updated.clone());

        debug!(event = %event_id, user = %user_id, "Removed user from member set");
        Ok(Some(updated))
    }

    async fn read(&self, event_id: &EventId) -> StoreResult<Option<MembershipRecord>> {
        let records = self.lock()?;
        Ok(records.get(event_id).cloned())
    }

    async fn delete(&self, event_id: &EventId) -> StoreResult<()> {
        let mut records = self.lock()?;
        records.remove(event_id);

        debug!(event = %event_id, "Deleted membership record");
        Ok(())
    }
}
