//! NATS client abstraction and membership event publisher

use async_nats::{Client, ConnectOptions, Subscriber};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{StoreError, StoreResult};
use crate::events::MembershipEvent;

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "rsvp-admission".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// NATS client wrapper providing domain-specific operations
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Create a new NATS client with the given configuration
    pub async fn new(config: NatsConfig) -> StoreResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self { client })
    }

    /// Wrap an existing NATS client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Publish a message to a subject
    pub async fn publish<T>(&self, subject: &str, message: &T) -> StoreResult<()>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| StoreError::Publish(e.to_string()))?;

        debug!("Published message to subject: {}", subject);
        Ok(())
    }

    /// Subscribe to a subject
    pub async fn subscribe(&self, subject: &str) -> StoreResult<Subscriber> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        info!("Subscribed to subject: {}", subject);
        Ok(subscriber)
    }

    /// Get the underlying NATS client for advanced operations
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Publisher for membership domain events
///
/// Routes each event to its subject (`rsvp.membership.{event}.{joined|left}`)
/// and serializes it as JSON. Publishing happens strictly after the store
/// mutation; it can inform downstream consumers but never influence an
/// admission decision.
#[derive(Clone)]
pub struct MembershipPublisher {
    client: NatsClient,
}

impl MembershipPublisher {
    /// Create a new publisher
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }

    /// Publish a single membership event
    pub async fn publish(&self, event: &MembershipEvent) -> StoreResult<()> {
        let subject = event.subject();

        self.client.publish(&subject, event).await?;

        info!(subject = %subject, "Membership event published");
        Ok(())
    }
}
