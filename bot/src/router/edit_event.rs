use tracing::instrument;

use shared::models::{field, Fields, Reply, Role};

use crate::session::{EditEventSession, EditEventStep, Session};
use crate::{dates, replies};

use super::Router;

/// Keep-previous-value sentinel accepted in the edit-all chain.
const KEEP: &str = "เหมือนเดิม";

impl Router {
    /// One turn of the edit flow. The menu step picks a single-field or
    /// edit-all branch; single-field steps commit immediately, the
    /// edit-all chain re-collects all three fields (with the "เหมือนเดิม"
    /// sentinel keeping a value) and commits at the date step.
    #[instrument(name = "edit event step", skip(self, state, text), fields(sender = %sender, target = %state.target))]
    pub(super) async fn edit_event_step(
        &self,
        sender: &str,
        state: EditEventSession,
        text: &str,
    ) -> Reply {
        let EditEventSession {
            target,
            current,
            step,
        } = state;
        match step {
            EditEventStep::Menu => {
                let (next, prompt) = match text {
                    "แก้ชื่อ" => (
                        EditEventStep::Title,
                        replies::edit_title_prompt(current.title()),
                    ),
                    "แก้รายละเอียด" => (
                        EditEventStep::Description,
                        replies::edit_description_prompt(current.description()),
                    ),
                    "แก้วันที่" => (
                        EditEventStep::Date,
                        replies::edit_date_prompt(current.date()),
                    ),
                    "แก้ทั้งหมด" => (
                        EditEventStep::AllTitle,
                        replies::edit_all_prompt("ชื่อกิจกรรม", current.title()),
                    ),
                    _ => return replies::edit_menu(&current),
                };
                self.sessions.set(
                    sender,
                    Session::EditEvent(EditEventSession {
                        target,
                        current,
                        step: next,
                    }),
                );
                prompt
            }
            EditEventStep::Title => {
                if text.is_empty() || text.chars().count() > 255 {
                    return Reply::cancelable(
                        "❌ ชื่อกิจกรรมต้องไม่ว่างและยาวไม่เกิน 255 ตัวอักษรค่ะ",
                    );
                }
                self.commit(sender, target, [(field::TITLE, text.to_string())])
                    .await
            }
            EditEventStep::Description => {
                if text.is_empty() {
                    return Reply::cancelable("❌ รายละเอียดว่างไม่ได้ค่ะ");
                }
                self.commit(sender, target, [(field::DESCRIPTION, text.to_string())])
                    .await
            }
            EditEventStep::Date => {
                let date = match dates::parse_date(text) {
                    Ok(date) => date,
                    Err(error) => {
                        return Reply::date_picker(format!(
                            "❌ {error}\n\n🔸 ส่งวันที่ใหม่ (YYYY-MM-DD)"
                        ))
                    }
                };
                self.commit(
                    sender,
                    target,
                    [(field::DATE, date.format(dates::DATE_FORMAT).to_string())],
                )
                .await
            }
            EditEventStep::AllTitle => {
                let title = if text == KEEP {
                    current.title().to_string()
                } else {
                    text.to_string()
                };
                if title.is_empty() || title.chars().count() > 255 {
                    return Reply::cancelable(
                        "❌ ชื่อกิจกรรมต้องไม่ว่างและยาวไม่เกิน 255 ตัวอักษรค่ะ",
                    );
                }
                let prompt = replies::edit_all_prompt("รายละเอียด", current.description());
                self.sessions.set(
                    sender,
                    Session::EditEvent(EditEventSession {
                        target,
                        current,
                        step: EditEventStep::AllDescription { title },
                    }),
                );
                prompt
            }
            EditEventStep::AllDescription { title } => {
                if text.is_empty() {
                    return Reply::cancelable(format!(
                        "❌ รายละเอียดว่างไม่ได้ค่ะ\n\n💬 ส่งรายละเอียดใหม่ หรือพิมพ์ \"{KEEP}\" เพื่อคงค่าเดิม"
                    ));
                }
                let description = if text == KEEP {
                    current.description().to_string()
                } else {
                    text.to_string()
                };
                let prompt = replies::edit_all_prompt(
                    "วันที่ (YYYY-MM-DD)",
                    &dates::format_thai(current.date()),
                );
                self.sessions.set(
                    sender,
                    Session::EditEvent(EditEventSession {
                        target,
                        current,
                        step: EditEventStep::AllDate { title, description },
                    }),
                );
                prompt
            }
            EditEventStep::AllDate { title, description } => {
                let date = if text == KEEP {
                    current.date().to_string()
                } else {
                    match dates::parse_date(text) {
                        Ok(date) => date.format(dates::DATE_FORMAT).to_string(),
                        Err(error) => {
                            return Reply::cancelable(format!(
                                "❌ {error}\n\n💬 ส่งวันที่ใหม่ หรือพิมพ์ \"{KEEP}\" เพื่อคงค่าเดิม"
                            ))
                        }
                    }
                };
                self.commit(
                    sender,
                    target,
                    [
                        (field::TITLE, title),
                        (field::DESCRIPTION, description),
                        (field::DATE, date),
                    ],
                )
                .await
            }
        }
    }

    /// Terminal edit step: push the collected fields, then drop the
    /// session whatever the executor said.
    async fn commit<const N: usize>(
        &self,
        sender: &str,
        target: uuid::Uuid,
        changes: [(&str, String); N],
    ) -> Reply {
        let mut fields = Fields::new();
        for (name, value) in changes {
            fields.insert(name.to_string(), value);
        }
        let result = self.executor.update_entity(target, fields).await;
        self.sessions.remove(sender);
        match result {
            Ok(updated) => {
                tracing::info!(%target, "event updated via guided flow");
                replies::event_updated(&updated)
            }
            Err(error) => replies::from_error(error, Role::Admin),
        }
    }
}
