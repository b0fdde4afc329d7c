use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::models::{Entity, Role, SenderId};
use uuid::Uuid;

/// Per-sender record of guided-flow progress. One tagged variant per mode;
/// each step carries exactly the fields accumulated so far, so a handler
/// cannot read a field its flow has not collected yet.
#[derive(Debug, Clone)]
pub enum Session {
    AddEvent(AddEventStep),
    EditEvent(EditEventSession),
    Search(SearchStep),
    Notify(NotifyStep),
}

#[derive(Debug, Clone, Default)]
pub enum AddEventStep {
    #[default]
    Title,
    Description {
        title: String,
    },
    Date {
        title: String,
        description: String,
    },
}

#[derive(Debug, Clone)]
pub struct EditEventSession {
    pub target: Uuid,
    /// Snapshot taken at flow entry, used for prompts and for the
    /// "เหมือนเดิม" keep-previous-value sentinel.
    pub current: Entity,
    pub step: EditEventStep,
}

#[derive(Debug, Clone)]
pub enum EditEventStep {
    Menu,
    Title,
    Description,
    Date,
    AllTitle,
    AllDescription {
        title: String,
    },
    AllDate {
        title: String,
        description: String,
    },
}

#[derive(Debug, Clone)]
pub enum SearchStep {
    Menu,
    Text,
    Date,
    Free,
}

#[derive(Debug, Clone)]
pub enum NotifyStep {
    Menu,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AddEvent,
    EditEvent,
    Search,
    Notify,
}

impl Session {
    pub fn mode(&self) -> Mode {
        match self {
            Session::AddEvent(_) => Mode::AddEvent,
            Session::EditEvent(_) => Mode::EditEvent,
            Session::Search(_) => Mode::Search,
            Session::Notify(_) => Mode::Notify,
        }
    }
}

impl Mode {
    /// Continuation is role-checked against this, same as flow entry.
    pub fn role_required(&self) -> Role {
        match self {
            Mode::Search => Role::User,
            _ => Role::Admin,
        }
    }
}

/// Shared mutable session state keyed by sender. The plain mutex guards
/// the maps themselves; the per-sender async guard serializes the whole
/// handling of one sender's messages so two racing messages cannot both
/// complete the same flow. Sessions never expire on their own.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SenderId, Session>>,
    guards: Mutex<HashMap<SenderId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sender: &str) -> Option<Session> {
        self.sessions.lock().expect("session map").get(sender).cloned()
    }

    /// Replaces any previous session, keeping the one-per-sender invariant.
    pub fn set(&self, sender: &str, session: Session) {
        self.sessions
            .lock()
            .expect("session map")
            .insert(sender.to_string(), session);
    }

    pub fn remove(&self, sender: &str) -> Option<Session> {
        self.sessions.lock().expect("session map").remove(sender)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.lock().expect("session map").len()
    }

    /// Per-sender lock; hold it across the whole handling of a message.
    pub fn guard(&self, sender: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.guards
            .lock()
            .expect("guard map")
            .entry(sender.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_session_per_sender() {
        let store = SessionStore::new();
        store.set("U1", Session::AddEvent(AddEventStep::Title));
        store.set(
            "U1",
            Session::AddEvent(AddEventStep::Description {
                title: "งานบุญ".into(),
            }),
        );
        assert_eq!(store.active_count(), 1);
        match store.get("U1") {
            Some(Session::AddEvent(AddEventStep::Description { title })) => {
                assert_eq!(title, "งานบุญ")
            }
            other => panic!("unexpected session: {other:?}"),
        }
    }

    #[test]
    fn remove_returns_the_session() {
        let store = SessionStore::new();
        store.set("U1", Session::Search(SearchStep::Menu));
        assert!(matches!(
            store.remove("U1"),
            Some(Session::Search(SearchStep::Menu))
        ));
        assert!(store.get("U1").is_none());
        assert!(store.remove("U1").is_none());
    }

    #[test]
    fn senders_are_independent() {
        let store = SessionStore::new();
        store.set("U1", Session::Search(SearchStep::Text));
        store.set("U2", Session::Notify(NotifyStep::Menu));
        assert_eq!(store.active_count(), 2);
        assert!(matches!(store.get("U1"), Some(Session::Search(_))));
        assert!(matches!(store.get("U2"), Some(Session::Notify(_))));
    }

    #[test]
    fn admin_modes_declare_their_role() {
        assert_eq!(Mode::Search.role_required(), Role::User);
        assert_eq!(Mode::AddEvent.role_required(), Role::Admin);
        assert_eq!(Mode::EditEvent.role_required(), Role::Admin);
        assert_eq!(Mode::Notify.role_required(), Role::Admin);
    }
}
