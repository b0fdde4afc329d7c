use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// String-keyed field bag accumulated by guided flows and handed to the
/// executor on commit. Ordered so serialized payloads are stable.
pub type Fields = BTreeMap<String, String>;

/// Canonical field names shared between step handlers and executors.
pub mod field {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DATE: &str = "date";
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const USER_ID: &str = "user_id";
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Entity {
    /// UUID assigned at creation
    #[builder(try_setter, default = Uuid::new_v4())]
    pub id: Uuid,

    /// What kind of record this is
    #[builder(setter(into))]
    pub kind: EntityKind,

    /// The record's payload, keyed by the names in [`field`]
    pub fields: Fields,

    /// Sender id of the creator
    #[builder(setter(into))]
    pub created_by: String,

    /// When the record was created
    #[builder(setter(custom), default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.get(field::TITLE)
    }
    pub fn description(&self) -> &str {
        self.get(field::DESCRIPTION)
    }
    pub fn date(&self) -> &str {
        self.get(field::DATE)
    }
}

impl EntityBuilder {
    fn validate(&self) -> Result<(), String> {
        let Some(fields) = self.fields.as_ref() else {
            return Ok(());
        };
        let missing = |name: &str| !fields.contains_key(name);
        match self.kind {
            Some(EntityKind::Event) => {
                if missing(field::TITLE) || missing(field::DATE) {
                    return Err(String::from("event requires title and date"));
                }
                let title = &fields[field::TITLE];
                // character count, not bytes: Thai titles are multi-byte
                if title.is_empty() || title.chars().count() > 255 {
                    return Err(String::from("wrong title"));
                }
            }
            Some(EntityKind::Contact) => {
                if missing(field::NAME) || missing(field::PHONE) {
                    return Err(String::from("contact requires name and phone"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn created_at(&mut self, seconds: i64, nanos: i32) -> &mut Self {
        self.created_at = DateTime::from_timestamp(seconds, nanos as u32);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A dated activity announced to subscribers
    Event,
    /// A phonebook entry
    Contact,
    /// A notification subscription, owned by its sender
    Subscriber,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_fields(title: &str, date: &str) -> Fields {
        let mut f = Fields::new();
        f.insert(field::TITLE.into(), title.into());
        f.insert(field::DESCRIPTION.into(), "desc".into());
        f.insert(field::DATE.into(), date.into());
        f
    }

    #[test]
    fn builds_valid_event() {
        let entity = Entity::builder()
            .kind(EntityKind::Event)
            .fields(event_fields("ประชุมทีม", "2025-09-01"))
            .created_by("U1")
            .build()
            .unwrap();
        assert_eq!(entity.title(), "ประชุมทีม");
        assert_eq!(entity.date(), "2025-09-01");
    }

    #[test]
    fn title_limit_counts_characters_not_bytes() {
        // 100 Thai characters is ~300 bytes; it must still build
        let long_thai: String = "ง".repeat(100);
        let entity = Entity::builder()
            .kind(EntityKind::Event)
            .fields(event_fields(&long_thai, "2025-09-01"))
            .created_by("U1")
            .build();
        assert!(entity.is_ok());

        let too_long: String = "ง".repeat(256);
        let err = Entity::builder()
            .kind(EntityKind::Event)
            .fields(event_fields(&too_long, "2025-09-01"))
            .created_by("U1")
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn rejects_event_without_title() {
        let mut fields = Fields::new();
        fields.insert(field::DATE.into(), "2025-09-01".into());
        let err = Entity::builder()
            .kind(EntityKind::Event)
            .fields(fields)
            .created_by("U1")
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn rejects_contact_without_phone() {
        let mut fields = Fields::new();
        fields.insert(field::NAME.into(), "สมชาย".into());
        let err = Entity::builder()
            .kind(EntityKind::Contact)
            .fields(fields)
            .created_by("U1")
            .build();
        assert!(err.is_err());
    }
}
