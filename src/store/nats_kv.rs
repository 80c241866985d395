// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream KV Membership Store
//!
//! Production implementation of [`MembershipStore`] over a JetStream
//! Key-Value bucket, one key per event. The conditional add is expressed
//! as a revision-checked update: the record is read together with its
//! revision, the admission predicate is evaluated against that exact
//! value, and the write is applied only if the revision is unchanged.
//! The KV bucket's compare-and-swap is the sole synchronization
//! primitive, so the capacity and uniqueness invariants hold across
//! independent server processes sharing the bucket.

use async_nats::jetstream::{self, kv};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{Capacity, EventId, MembershipRecord, UserId};
use crate::errors::{StoreError, StoreResult};
use crate::store::{AdmissionPredicate, ConditionalAdd, MembershipStore};

/// Compare-and-swap budget per store operation
///
/// The KV bucket offers a revision-checked update rather than a
/// server-evaluated predicate, so realizing one indivisible
/// check-and-apply may take several read/CAS rounds when writers collide.
/// Each round is itself atomic and re-evaluates against fresh state; the
/// cap keeps latency bounded under pathological contention, surfacing
/// `StoreError::Contention` instead of spinning.
const CAS_ATTEMPTS: u32 = 8;

/// Storage type for the membership bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// File-based storage (persistent across restarts)
    File,
    /// Memory-based storage (faster, but lost on restart)
    Memory,
}

/// Configuration for the membership KV bucket
#[derive(Debug, Clone)]
pub struct MembershipBucketConfig {
    /// Bucket name
    pub bucket: String,

    /// Human-readable bucket description
    pub description: String,

    /// Revisions of history kept per key
    pub history: i64,

    /// Storage type (File or Memory)
    pub storage: StorageType,

    /// Number of replicas (for clustered NATS)
    pub replicas: usize,
}

impl Default for MembershipBucketConfig {
    fn default() -> Self {
        Self {
            bucket: "rsvp-membership".to_string(),
            description: "RSVP event membership records".to_string(),
            history: 1,
            storage: StorageType::File,
            replicas: 1,
        }
    }
}

/// Whether a failed KV update was a compare-and-swap conflict
///
/// The server reports a stale revision as a "wrong last sequence" error;
/// anything else is a real infrastructure problem.
fn is_revision_conflict(message: &str) -> bool {
    let msg = message.to_lowercase();
    msg.contains("wrong last sequence") || msg.contains("wrong last revision")
}

/// Whether an entry represents a live record rather than a deletion marker
fn is_live(entry: &kv::Entry) -> bool {
    matches!(entry.operation, kv::Operation::Put)
}

/// NATS JetStream KV-backed membership store
///
/// # Example
///
/// ```rust,no_run
/// use rsvp_admission::store::NatsKvMembershipStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = NatsKvMembershipStore::connect("nats://localhost:4222").await?;
///     // Use store...
///     Ok(())
/// }
/// ```
pub struct NatsKvMembershipStore {
    /// KV bucket holding one record per event
    store: kv::Store,

    /// Bucket name, for logging
    bucket: String,
}

impl NatsKvMembershipStore {
    /// Connect to NATS and open the membership bucket with defaults
    pub async fn connect(nats_url: &str) -> StoreResult<Self> {
        Self::connect_with_config(nats_url, MembershipBucketConfig::default()).await
    }

    /// Connect with custom bucket configuration
    pub async fn connect_with_config(
        nats_url: &str,
        config: MembershipBucketConfig,
    ) -> StoreResult<Self> {
        let client = async_nats::connect(nats_url)
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        Self::from_client(client, config).await
    }

    /// Build the store from an existing NATS client
    ///
    /// Creates the bucket if it does not exist (idempotent).
    pub async fn from_client(
        client: async_nats::Client,
        config: MembershipBucketConfig,
    ) -> StoreResult<Self> {
        let jetstream = jetstream::new(client);

        let storage = match config.storage {
            StorageType::File => jetstream::stream::StorageType::File,
            StorageType::Memory => jetstream::stream::StorageType::Memory,
        };

        let store = jetstream
            .create_key_value(kv::Config {
                bucket: config.bucket.clone(),
                description: config.description.clone(),
                history: config.history,
                storage,
                num_replicas: config.replicas,
                ..Default::default()
            })
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        info!(bucket = %config.bucket, "Opened membership KV bucket");

        Ok(Self {
            store,
            bucket: config.bucket,
        })
    }

    /// Fetch the live entry for an event, skipping deletion markers
    async fn live_entry(&self, event_id: &EventId) -> StoreResult<Option<kv::Entry>> {
        let entry = self
            .store
            .entry(event_id.as_str())
            .await
            .map_err(|e| StoreError::KeyValue(e.to_string()))?;

        Ok(entry.filter(is_live))
    }

    fn decode(entry: &kv::Entry) -> StoreResult<MembershipRecord> {
        serde_json::from_slice(&entry.value)
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    fn encode(record: &MembershipRecord) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl MembershipStore for NatsKvMembershipStore {
    async fn create(
        &self,
        event_id: &EventId,
        capacity: Capacity,
    ) -> StoreResult<MembershipRecord> {
        let record = MembershipRecord::new(event_id.clone(), capacity);
        let payload = Self::encode(&record)?;

        // A deletion marker still occupies a revision; creating over one
        // is a revision-checked update, and creating a brand-new key is an
        // update against revision zero.
        let entry = self
            .store
            .entry(event_id.as_str())
            .await
            .map_err(|e| StoreError::KeyValue(e.to_string()))?;

        let revision = match entry {
            Some(ref existing) if is_live(existing) => {
                return Err(StoreError::AlreadyExists(event_id.to_string()));
            }
            Some(marker) => marker.revision,
            None => 0,
        };

        match self
            .store
            .update(event_id.as_str(), payload.into(), revision)
            .await
        {
            Ok(_) => {
                info!(bucket = %self.bucket, event = %event_id, %capacity, "Created membership record");
                Ok(record)
            }
            Err(e) if is_revision_conflict(&e.to_string()) => {
                // Lost a create race; someone else owns the record now.
                Err(StoreError::AlreadyExists(event_id.to_string()))
            }
            Err(e) => Err(StoreError::KeyValue(e.to_string())),
        }
    }

    async fn conditional_add(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        predicate: AdmissionPredicate<'_>,
    ) -> StoreResult<ConditionalAdd> {
        // One indivisible check-and-apply, realized over the bucket's
        // revision-checked update. A predicate verdict against the current
        // record is final and is never re-tried; only a pure revision
        // conflict (no verdict reached, the record moved underneath the
        // read) re-drives the read/CAS round.
        for attempt in 1..=CAS_ATTEMPTS {
            let Some(entry) = self.live_entry(event_id).await? else {
                return Ok(ConditionalAdd::Rejected);
            };

            let record = Self::decode(&entry)?;

            if !predicate(&record) {
                debug!(event = %event_id, user = %user_id, "Admission predicate failed");
                return Ok(ConditionalAdd::Rejected);
            }

            // The record-level guards still apply even if a caller hands
            // in a laxer predicate; the invariants are the store's to
            // protect.
            let updated = match record.with_member(user_id.clone()) {
                Ok(updated) => updated,
                Err(_) => return Ok(ConditionalAdd::Rejected),
            };

            let payload = Self::encode(&updated)?;

            // Applies only if the record is still the exact value the
            // predicate saw.
            match self
                .store
                .update(event_id.as_str(), payload.into(), entry.revision)
                .await
            {
                Ok(_) => {
                    debug!(
                        event = %event_id,
                        user = %user_id,
                        members = updated.members.len(),
                        "Conditional add applied"
                    );
                    return Ok(ConditionalAdd::Applied(updated));
                }
                Err(e) if is_revision_conflict(&e.to_string()) => {
                    debug!(
                        event = %event_id,
                        user = %user_id,
                        attempt,
                        "Conditional add hit a revision conflict, re-reading"
                    );
                }
                Err(e) => return Err(StoreError::KeyValue(e.to_string())),
            }
        }

        Err(StoreError::Contention {
            attempts: CAS_ATTEMPTS,
            context: format!("conditional add of {user_id} to {event_id}"),
        })
    }

    async fn remove(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> StoreResult<Option<MembershipRecord>> {
        // Unconditional atomic removal over a CAS-only backend: each
        // iteration is one atomic revision-checked write. The outcome for
        // the caller never changes across iterations; only the snapshot
        // the write is based on does.
        for attempt in 1..=CAS_ATTEMPTS {
            let Some(entry) = self.live_entry(event_id).await? else {
                return Ok(None);
            };

            let record = Self::decode(&entry)?;

            if !record.is_member(user_id) {
                return Ok(Some(record));
            }

            let updated = record.without_member(user_id);
            let payload = Self::encode(&updated)?;

            match self
                .store
                .update(event_id.as_str(), payload.into(), entry.revision)
                .await
            {
                Ok(_) => {
                    debug!(event = %event_id, user = %user_id, "Removed user from member set");
                    return Ok(Some(updated));
                }
                Err(e) if is_revision_conflict(&e.to_string()) => {
                    warn!(
                        event = %event_id,
                        user = %user_id,
                        attempt,
                        "Remove lost a compare-and-swap race, re-reading"
                    );
                }
                Err(e) => return Err(StoreError::KeyValue(e.to_string())),
            }
        }

        Err(StoreError::Contention {
            attempts: CAS_ATTEMPTS,
            context: format!("remove {user_id} from {event_id}"),
        })
    }

    async fn read(&self, event_id: &EventId) -> StoreResult<Option<MembershipRecord>> {
        match self.live_entry(event_id).await? {
            Some(entry) => Ok(Some(Self::decode(&entry)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, event_id: &EventId) -> StoreResult<()> {
        self.store
            .purge(event_id.as_str())
            .await
            .map_err(|e| StoreError::KeyValue(e.to_string()))?;

        info!(bucket = %self.bucket, event = %event_id, "Purged membership record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests with a real NATS server live in
    // tests/nats_kv_integration.rs and are marked #[ignore].

    #[test]
    fn test_default_config() {
        let config = MembershipBucketConfig::default();
        assert_eq!(config.bucket, "rsvp-membership");
        assert_eq!(config.history, 1);
        assert_eq!(config.storage, StorageType::File);
        assert_eq!(config.replicas, 1);
    }

    #[test]
    fn test_revision_conflict_detection() {
        assert!(is_revision_conflict(
            "nats: API error: code=10071 err_code=10071 description=wrong last sequence: 42"
        ));
        assert!(is_revision_conflict("Wrong Last Revision"));
        assert!(!is_revision_conflict("timed out"));
        assert!(!is_revision_conflict("connection reset"));
    }
}
