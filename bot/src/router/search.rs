use tracing::instrument;

use shared::models::{EntityKind, Reply, Role};
use shared::{Filter, Query};

use crate::session::{SearchStep, Session};
use crate::{dates, replies};

use super::Router;

impl Router {
    /// One turn of the guided search. The menu picks a query shape, the
    /// following step runs it. Every query step is terminal, so a search
    /// session lasts at most two turns.
    #[instrument(name = "search step", skip(self, step, text), fields(sender = %sender))]
    pub(super) async fn search_step(
        &self,
        sender: &str,
        role: Role,
        step: SearchStep,
        text: &str,
    ) -> Reply {
        match step {
            SearchStep::Menu => {
                let (next, prompt) = match text {
                    "ค้นหาข้อความ" => (SearchStep::Text, replies::search_text_prompt()),
                    "ค้นหาวันที่" => (SearchStep::Date, replies::search_date_prompt()),
                    "ค้นหาทั้งหมด" => (SearchStep::Free, replies::search_free_prompt()),
                    _ => return replies::search_menu(),
                };
                self.sessions.set(sender, Session::Search(next));
                prompt
            }
            SearchStep::Text => {
                if text.is_empty() {
                    return replies::search_text_prompt();
                }
                self.run_search(sender, role, text, Query::Text(text.to_string()))
                    .await
            }
            SearchStep::Date => {
                let date = match dates::parse_date(text) {
                    Ok(date) => date,
                    Err(error) => {
                        return Reply::date_picker(format!(
                            "❌ {error}\n\n📅 ส่งวันที่ที่ต้องการค้นหา (YYYY-MM-DD)"
                        ))
                    }
                };
                self.run_search(sender, role, text, Query::On(date)).await
            }
            SearchStep::Free => {
                if text.is_empty() {
                    return replies::search_free_prompt();
                }
                // date-looking input searches by date, anything else by text
                let result = self.search_once(text, role).await;
                self.sessions.remove(sender);
                result.unwrap_or_else(|e| replies::from_error(e, role))
            }
        }
    }

    async fn run_search(&self, sender: &str, role: Role, term: &str, query: Query) -> Reply {
        let result = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, query))
            .await;
        self.sessions.remove(sender);
        match result {
            Ok(events) => replies::search_results(term, &events, role),
            Err(error) => replies::from_error(error, role),
        }
    }
}
