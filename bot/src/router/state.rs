use shared::models::{Reply, Role};

use crate::session::Session;

use super::Router;

impl Router {
    /// Forward mid-flow text to the handler for the session's mode. The
    /// handler owns the session transition: it advances, keeps, or removes
    /// the stored session itself and always produces a reply.
    pub(super) async fn continue_session(
        &self,
        sender: &str,
        role: Role,
        session: Session,
        text: &str,
    ) -> Reply {
        match session {
            Session::AddEvent(step) => self.add_event_step(sender, step, text).await,
            Session::EditEvent(state) => self.edit_event_step(sender, state, text).await,
            Session::Search(step) => self.search_step(sender, role, step, text).await,
            Session::Notify(step) => self.notify_step(sender, step, text).await,
        }
    }
}
