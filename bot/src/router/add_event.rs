use tracing::instrument;

use shared::models::{field, EntityKind, Fields, Reply, Role};

use crate::session::{AddEventStep, Session};
use crate::{dates, replies};

use super::Router;

const TITLE_MAX: usize = 255;

impl Router {
    /// One turn of the three-step add-event flow. A rejected answer leaves
    /// the stored step untouched and re-asks the same question; the date
    /// step is terminal and commits through the executor.
    #[instrument(name = "add event step", skip(self, step, text), fields(sender = %sender))]
    pub(super) async fn add_event_step(
        &self,
        sender: &str,
        step: AddEventStep,
        text: &str,
    ) -> Reply {
        match step {
            AddEventStep::Title => {
                if text.is_empty() {
                    return Reply::cancelable(
                        "❌ ชื่อกิจกรรมว่างไม่ได้ค่ะ\n\n💬 พิมพ์ชื่อกิจกรรมแล้วส่งมาอีกครั้ง",
                    );
                }
                if text.chars().count() > TITLE_MAX {
                    return Reply::cancelable(
                        "❌ ชื่อกิจกรรมยาวเกินไปค่ะ (สูงสุด 255 ตัวอักษร)",
                    );
                }
                self.sessions.set(
                    sender,
                    Session::AddEvent(AddEventStep::Description {
                        title: text.to_string(),
                    }),
                );
                replies::add_event_description_prompt(text)
            }
            AddEventStep::Description { title } => {
                if text.is_empty() {
                    return Reply::cancelable(
                        "❌ รายละเอียดว่างไม่ได้ค่ะ\n\n💬 พิมพ์รายละเอียดแล้วส่งมาอีกครั้ง",
                    );
                }
                let prompt = replies::add_event_date_prompt(&title, text);
                self.sessions.set(
                    sender,
                    Session::AddEvent(AddEventStep::Date {
                        title,
                        description: text.to_string(),
                    }),
                );
                prompt
            }
            AddEventStep::Date { title, description } => {
                let date = match dates::parse_date(text) {
                    Ok(date) => date,
                    Err(error) => {
                        // session untouched, same question again
                        return Reply::date_picker(format!(
                            "❌ {error}\n\n🔸 ส่งวันที่กิจกรรม (YYYY-MM-DD)"
                        ));
                    }
                };
                let mut fields = Fields::new();
                fields.insert(field::TITLE.into(), title.clone());
                fields.insert(field::DESCRIPTION.into(), description.clone());
                fields.insert(
                    field::DATE.into(),
                    date.format(dates::DATE_FORMAT).to_string(),
                );
                fields.insert(field::USER_ID.into(), sender.to_string());
                let result = self.executor.create_entity(EntityKind::Event, fields).await;
                // the flow is over either way, the session does not survive
                // a failed commit
                self.sessions.remove(sender);
                match result {
                    Ok(id) => {
                        tracing::info!(%id, "event created via guided flow");
                        replies::event_created(
                            id,
                            &title,
                            &description,
                            &date.format(dates::DATE_FORMAT).to_string(),
                        )
                    }
                    Err(error) => replies::from_error(error, Role::Admin),
                }
            }
        }
    }
}
