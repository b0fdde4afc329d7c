use tracing::instrument;

use shared::models::{EntityKind, Menu, Reply, Role};
use shared::{Filter, Query};

use crate::session::{NotifyStep, Session};
use crate::{dates, replies};

use super::Router;

impl Router {
    /// One turn of the notify flow: pick a notification kind, then either
    /// broadcast immediately (upcoming digest, stats are read-only) or
    /// collect a custom message first.
    #[instrument(name = "notify step", skip(self, step, text), fields(sender = %sender))]
    pub(super) async fn notify_step(&self, sender: &str, step: NotifyStep, text: &str) -> Reply {
        match step {
            NotifyStep::Menu => match text {
                "ข้อความกำหนดเอง" => {
                    self.sessions.set(sender, Session::Notify(NotifyStep::Custom));
                    replies::notify_custom_prompt()
                }
                "แจ้งกิจกรรมถัดไป" => self.broadcast_upcoming(sender).await,
                "ดูสถิติผู้สมัคร" => self.subscriber_stats(sender).await,
                _ => {
                    // unknown choice, show the menu again
                    match self.notify_counts().await {
                        Ok((subscribers, upcoming)) => replies::notify_menu(subscribers, upcoming),
                        Err(error) => {
                            self.sessions.remove(sender);
                            replies::from_error(error, Role::Admin)
                        }
                    }
                }
            },
            NotifyStep::Custom => {
                if text.is_empty() {
                    return replies::notify_custom_prompt();
                }
                let result = self.notify_now(text).await;
                self.sessions.remove(sender);
                result.unwrap_or_else(|e| replies::from_error(e, Role::Admin))
            }
        }
    }

    pub(super) async fn notify_counts(&self) -> shared::Result<(usize, usize)> {
        let subscribers = self
            .executor
            .list_entities(Filter::all(EntityKind::Subscriber))
            .await?;
        let upcoming = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::From(dates::today())))
            .await?;
        Ok((subscribers.len(), upcoming.len().min(5)))
    }

    /// Broadcast a digest of the next few events, terminal.
    async fn broadcast_upcoming(&self, sender: &str) -> Reply {
        let result = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::From(dates::today())))
            .await;
        let events = match result {
            Ok(events) => events,
            Err(error) => {
                self.sessions.remove(sender);
                return replies::from_error(error, Role::Admin);
            }
        };
        if events.is_empty() {
            self.sessions.remove(sender);
            return Reply::menu(
                "ยังไม่มีกิจกรรมถัดไปให้แจ้งเตือนค่ะ",
                Menu::Admin,
            );
        }
        let lines: Vec<String> = events
            .iter()
            .take(5)
            .map(|e| format!("📝 {} — {}", e.title(), dates::format_thai(e.date())))
            .collect();
        let message = format!("📅 กิจกรรมถัดไป:\n\n{}", lines.join("\n"));
        let result = self.notify_now(&message).await;
        self.sessions.remove(sender);
        result.unwrap_or_else(|e| replies::from_error(e, Role::Admin))
    }

    /// Read-only stats, terminal.
    async fn subscriber_stats(&self, sender: &str) -> Reply {
        let result = self
            .executor
            .list_entities(Filter::all(EntityKind::Subscriber))
            .await;
        self.sessions.remove(sender);
        match result {
            Ok(subscribers) => Reply::menu(
                format!(
                    "📊 สถิติผู้สมัครรับการแจ้งเตือน\n\n👥 จำนวนผู้สมัครทั้งหมด: {} คน",
                    subscribers.len()
                ),
                Menu::Admin,
            ),
            Err(error) => replies::from_error(error, Role::Admin),
        }
    }
}
