use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{field, Entity, EntityKind, Fields, SenderId};
use shared::{ActionExecutor, Audience, BroadcastReport, Error, Filter, Query, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-process reference implementation of the executor contract, used by
/// the demo binary and the integration tests. Broadcast "delivery" is an
/// outbox that callers can inspect.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entities: Arc<RwLock<HashMap<Uuid, Entity>>>,
    outbox: Arc<RwLock<Vec<(SenderId, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in send order.
    pub async fn outbox(&self) -> Vec<(SenderId, String)> {
        self.outbox.read().await.clone()
    }

    async fn subscribers(&self) -> Vec<SenderId> {
        let guard = self.entities.read().await;
        let mut ids: Vec<SenderId> = guard
            .values()
            .filter(|e| e.kind == EntityKind::Subscriber)
            .map(|e| e.created_by.clone())
            .collect();
        ids.sort();
        ids
    }
}

fn entity_date(entity: &Entity) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(entity.date(), DATE_FORMAT).ok()
}

fn matches(entity: &Entity, query: &Query) -> bool {
    match query {
        Query::All => true,
        Query::Id(id) => entity.id == *id,
        Query::Owner(sender) => entity.created_by == *sender,
        Query::On(date) => entity_date(entity) == Some(*date),
        Query::From(date) => entity_date(entity).is_some_and(|d| d >= *date),
        Query::Between(from, to) => entity_date(entity).is_some_and(|d| d >= *from && d <= *to),
        Query::Text(term) => {
            let term = term.to_lowercase();
            entity.title().to_lowercase().contains(&term)
                || entity.description().to_lowercase().contains(&term)
        }
        Query::Keywords(keywords) => keywords.iter().all(|kw| {
            let kw = kw.to_lowercase();
            entity.get(field::NAME).to_lowercase().contains(&kw)
                || entity.get(field::PHONE).contains(kw.as_str())
        }),
    }
}

#[async_trait]
impl ActionExecutor for MemoryStore {
    async fn create_entity(&self, kind: EntityKind, fields: Fields) -> Result<Uuid> {
        let created_by = fields.get(field::USER_ID).cloned().unwrap_or_default();
        let entity = Entity::builder()
            .kind(kind)
            .fields(fields)
            .created_by(created_by)
            .build()
            .map_err(|e| Error::validation(e.to_string()))?;
        let id = entity.id;
        self.entities.write().await.insert(id, entity);
        tracing::debug!(%id, %kind, "entity created");
        Ok(id)
    }

    async fn update_entity(&self, id: Uuid, fields: Fields) -> Result<Entity> {
        let mut guard = self.entities.write().await;
        let entity = guard
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(id.to_string()))?;
        for (name, value) in fields {
            entity.fields.insert(name, value);
        }
        Ok(entity.clone())
    }

    async fn delete_entity(&self, id: Uuid) -> Result<Entity> {
        self.entities
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| Error::not_found(id.to_string()))
    }

    async fn list_entities(&self, filter: Filter) -> Result<Vec<Entity>> {
        let guard = self.entities.read().await;
        let mut found: Vec<Entity> = guard
            .values()
            .filter(|e| e.kind == filter.kind && matches(e, &filter.query))
            .cloned()
            .collect();
        // stable order for pagination: by date where present, then creation
        found.sort_by(|a, b| (entity_date(a), a.created_at).cmp(&(entity_date(b), b.created_at)));
        Ok(found)
    }

    async fn broadcast(&self, message: &str, audience: Audience) -> Result<BroadcastReport> {
        let recipients = match audience {
            Audience::Subscribers => self.subscribers().await,
            Audience::Recipients(ids) => ids,
        };
        let mut outbox = self.outbox.write().await;
        let mut report = BroadcastReport::default();
        for recipient in recipients {
            outbox.push((recipient, message.to_string()));
            report.sent += 1;
        }
        tracing::info!(sent = report.sent, failed = report.failed, "broadcast");
        Ok(report)
    }
}
