mod add_event;
mod commands;
mod edit_event;
mod notify;
mod search;
mod state;

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use shared::models::{Entity, EntityKind, Reply, Role};
use shared::{ActionExecutor, Error, Filter, Query, Result};

use crate::commands::{is_cancel, Command, FlowEntry};
use crate::session::{
    AddEventStep, EditEventSession, EditEventStep, NotifyStep, SearchStep, Session,
};
use crate::{incomplete, replies, Config, SessionStore};

/// The conversational core: one call per inbound message, one [`Reply`]
/// out, no exceptions. Evaluation order is fixed — cancellation, session
/// continuation, normalization + incomplete-command check, stateless
/// command, guided-flow entry, fallback — and mid-flow text is data, never
/// a new command.
pub struct Router {
    config: Config,
    sessions: SessionStore,
    executor: Arc<dyn ActionExecutor>,
}

impl Router {
    pub fn new(config: Config, executor: Arc<dyn ActionExecutor>) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            executor,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound message. The per-sender guard is held for the
    /// whole call, so a sender's messages are processed in order and two
    /// racing messages can never both complete the same flow; different
    /// senders proceed concurrently.
    #[instrument(name = "handle message", skip(self, text), fields(sender = %sender))]
    pub async fn handle(&self, sender: &str, role: Role, text: &str) -> Reply {
        let guard = self.sessions.guard(sender);
        let _locked = guard.lock().await;

        let text = text.trim();

        // cancellation pre-empts everything, including step dispatch
        if is_cancel(text) {
            if let Some(session) = self.sessions.remove(sender) {
                tracing::info!(mode = ?session.mode(), "flow cancelled");
                return replies::cancelled(role, session.mode());
            }
            // no active session: fall through, "สวัสดี" is also a greeting
        }

        // an active session claims the raw text; the step handler owns
        // its interpretation, the normalizer never sees it
        if let Some(session) = self.sessions.get(sender) {
            if session.mode().role_required().is_admin() && !role.is_admin() {
                return replies::forbidden(role);
            }
            return self.continue_session(sender, role, session, text).await;
        }

        let canonical = self.config.aliases.normalize(text);

        if let Some(found) = incomplete::detect(&canonical) {
            return found.into_reply();
        }

        if let Some(command) = Command::parse(&canonical) {
            if command.role_required().is_admin() && !role.is_admin() {
                tracing::debug!(?command, "rejected: admin only");
                return replies::forbidden(role);
            }
            return self
                .dispatch(sender, role, command)
                .await
                .unwrap_or_else(|e| replies::from_error(e, role));
        }

        if let Some(entry) = FlowEntry::parse(&canonical) {
            if entry.role_required().is_admin() && !role.is_admin() {
                return replies::forbidden(role);
            }
            return self
                .enter_flow(sender, entry)
                .await
                .unwrap_or_else(|e| replies::from_error(e, role));
        }

        replies::fallback(role)
    }

    /// Create a session at the flow's initial step and return the first
    /// prompt. The edit flow resolves its target up front; a stale id
    /// surfaces as NotFound and no session is created.
    async fn enter_flow(&self, sender: &str, entry: FlowEntry) -> Result<Reply> {
        let (session, prompt) = match entry {
            FlowEntry::AddEvent => (
                Session::AddEvent(AddEventStep::Title),
                replies::add_event_title_prompt(),
            ),
            FlowEntry::Search => (Session::Search(SearchStep::Menu), replies::search_menu()),
            FlowEntry::Notify => {
                let (subscribers, upcoming) = self.notify_counts().await?;
                (
                    Session::Notify(NotifyStep::Menu),
                    replies::notify_menu(subscribers, upcoming),
                )
            }
            FlowEntry::EditEvent { id } => {
                let current = self.fetch_event(&id).await?;
                let prompt = replies::edit_menu(&current);
                (
                    Session::EditEvent(EditEventSession {
                        target: current.id,
                        current,
                        step: EditEventStep::Menu,
                    }),
                    prompt,
                )
            }
        };
        tracing::info!(mode = ?session.mode(), "flow started");
        self.sessions.set(sender, session);
        Ok(prompt)
    }

    fn parse_event_id(&self, raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw.trim())
            .map_err(|_| Error::validation("ID ต้องเป็นรหัสกิจกรรมที่ถูกต้องค่ะ"))
    }

    async fn fetch_event(&self, raw_id: &str) -> Result<Entity> {
        let id = self.parse_event_id(raw_id)?;
        let found = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::Id(id)))
            .await?;
        found
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("กิจกรรม ID: {id}")))
    }
}
