use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Entity, EntityKind, Fields, SenderId};
use crate::Result;

/// Capability contract fulfilled outside the core: entity CRUD against the
/// persistent store plus notification fan-out. The router and the step
/// handlers depend on these signatures only, never on storage specifics.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn create_entity(&self, kind: EntityKind, fields: Fields) -> Result<Uuid>;
    async fn update_entity(&self, id: Uuid, fields: Fields) -> Result<Entity>;
    async fn delete_entity(&self, id: Uuid) -> Result<Entity>;
    async fn list_entities(&self, filter: Filter) -> Result<Vec<Entity>>;
    async fn broadcast(&self, message: &str, audience: Audience) -> Result<BroadcastReport>;
}

/// Filtered query against one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub kind: EntityKind,
    pub query: Query,
}

impl Filter {
    pub fn all(kind: EntityKind) -> Self {
        Self {
            kind,
            query: Query::All,
        }
    }
    pub fn new(kind: EntityKind, query: Query) -> Self {
        Self { kind, query }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    Id(Uuid),
    /// Records created by this sender
    Owner(SenderId),
    /// Events on exactly this date
    On(NaiveDate),
    /// Events on or after this date
    From(NaiveDate),
    /// Events within this inclusive range
    Between(NaiveDate, NaiveDate),
    /// Case-insensitive substring over title and description
    Text(String),
    /// Every keyword must match name or phone (contact search)
    Keywords(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Everyone with a subscriber record
    Subscribers,
    Recipients(Vec<SenderId>),
}

/// Partial delivery failure is tolerated and reported as counts, never as
/// a whole-operation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    pub sent: u32,
    pub failed: u32,
}

impl BroadcastReport {
    pub fn total(&self) -> u32 {
        self.sent + self.failed
    }
}
