use chrono::Datelike;
use regex::Regex;
use std::sync::OnceLock;
use tracing::instrument;

use shared::models::{field, EntityKind, Fields, Reply, Role};
use shared::{Audience, Error, Filter, Query, Result};

use crate::commands::Command;
use crate::{dates, phone, replies};

use super::Router;

const EVENTS_PER_PAGE: usize = 10;

fn date_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date pattern"))
}

const ADD_HELP: &str = "📝 วิธีเพิ่มกิจกรรม:\n\nแบบง่าย:\n/add บัตรตำรวจ อยู่ที่กระเป๋าปืน 2025-08-08\n\nแบบละเอียด:\n/add บัตรตำรวจ | อยู่ที่กระเป๋าปืน | 2025-08-08";

/// Split an inline add-event body into (title, description, date string).
/// Pipe-delimited input is taken verbatim; otherwise the first
/// date-looking word is pulled out and the remaining words are halved
/// between title and description, mirroring the lenient legacy format.
fn parse_add_body(body: &str) -> Result<(String, String, String)> {
    if body.contains(" | ") {
        let parts: Vec<&str> = body.splitn(3, " | ").collect();
        if parts.len() == 3 {
            return Ok((
                parts[0].trim().to_string(),
                parts[1].trim().to_string(),
                parts[2].trim().to_string(),
            ));
        }
        return Err(Error::validation(ADD_HELP));
    }
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.len() < 3 {
        return Err(Error::validation(ADD_HELP));
    }
    if let Some(idx) = words.iter().position(|w| date_word_re().is_match(w)) {
        let date = words[idx].to_string();
        let rest: Vec<&str> = words
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, w)| *w)
            .collect();
        let mid = rest.len() / 2;
        if mid == 0 {
            return Ok((rest.join(" "), "ไม่มีรายละเอียด".to_string(), date));
        }
        return Ok((rest[..mid].join(" "), rest[mid..].join(" "), date));
    }
    // no date-looking word: take the last two words as description and date
    Ok((
        words[..words.len() - 2].join(" "),
        words[words.len() - 2].to_string(),
        words[words.len() - 1].to_string(),
    ))
}

impl Router {
    /// Stateless dispatch: the command is complete, run it against the
    /// executor and answer. Role was already checked by `handle`.
    #[instrument(name = "stateless command", skip(self))]
    pub(super) async fn dispatch(
        &self,
        sender: &str,
        role: Role,
        command: Command,
    ) -> Result<Reply> {
        match command {
            Command::Greeting => Ok(replies::greeting()),
            Command::AdminMenu => Ok(replies::admin_menu()),
            Command::Recent { page } => self.recent(page, role).await,
            Command::Subscribe => self.subscribe(sender).await,
            Command::Today => self.events_on(dates::today(), "วันนี้", role).await,
            Command::Upcoming => self.upcoming(role).await,
            Command::Month => self.month(role).await,
            Command::SearchQuery { term } => self.search_once(&term, role).await,
            Command::ListEvents | Command::ManageEvents => self.list_all(role).await,
            Command::AddInline { body } => self.add_inline(sender, &body).await,
            Command::EditInline { body } => self.edit_inline(&body).await,
            Command::Delete { id } | Command::ConfirmDelete { id } => self.delete(&id).await,
            Command::DeleteRequest { id } => self.delete_request(&id).await,
            Command::Notify { message } => self.notify_now(&message).await,
            Command::AddContact { args } => self.add_contact(sender, &args).await,
            Command::FindContact { query } => self.find_contacts(&query, role).await,
            Command::ListContacts => self.list_contacts().await,
            Command::ContactHelp => Ok(replies::contact_help()),
        }
    }

    async fn recent(&self, page: u32, role: Role) -> Result<Reply> {
        let events = self
            .executor
            .list_entities(Filter::all(EntityKind::Event))
            .await?;
        if events.is_empty() {
            return Ok(replies::event_list(&[], String::new(), role));
        }
        let total_pages = events.len().div_ceil(EVENTS_PER_PAGE);
        let page = (page as usize).clamp(1, total_pages);
        let start = (page - 1) * EVENTS_PER_PAGE;
        let slice = &events[start..(start + EVENTS_PER_PAGE).min(events.len())];
        let caption = if total_pages > 1 {
            format!(
                "📄 หน้า {page}/{total_pages} (ทั้งหมด {} กิจกรรม)",
                events.len()
            )
        } else {
            "เลือกดูกิจกรรมอื่นๆ ได้เลยค่ะ".to_string()
        };
        Ok(replies::event_list(slice, caption, role))
    }

    async fn subscribe(&self, sender: &str) -> Result<Reply> {
        let existing = self
            .executor
            .list_entities(Filter::new(
                EntityKind::Subscriber,
                Query::Owner(sender.to_string()),
            ))
            .await?;
        if !existing.is_empty() {
            return Ok(Reply::menu(
                "คุณได้สมัครรับการแจ้งเตือนอยู่แล้วค่ะ",
                shared::models::Menu::Main,
            ));
        }
        let mut fields = Fields::new();
        fields.insert(field::USER_ID.into(), sender.to_string());
        self.executor
            .create_entity(EntityKind::Subscriber, fields)
            .await?;
        Ok(Reply::menu(
            "✅ คุณได้สมัครรับการแจ้งเตือนกิจกรรมเรียบร้อยแล้วค่ะ",
            shared::models::Menu::Main,
        ))
    }

    async fn events_on(
        &self,
        date: chrono::NaiveDate,
        label: &str,
        role: Role,
    ) -> Result<Reply> {
        let events = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::On(date)))
            .await?;
        if events.is_empty() {
            return Ok(Reply::menu(
                format!("{label}ยังไม่มีกิจกรรมที่กำหนดไว้ค่ะ"),
                replies::home_menu(role),
            ));
        }
        Ok(replies::event_list(
            &events,
            format!("📅 กิจกรรม{label} {} รายการ", events.len()),
            role,
        ))
    }

    async fn upcoming(&self, role: Role) -> Result<Reply> {
        let events = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::From(dates::today())))
            .await?;
        if events.is_empty() {
            return Ok(Reply::menu(
                "ยังไม่มีกิจกรรมที่กำหนดไว้ในอนาคตค่ะ",
                replies::home_menu(role),
            ));
        }
        let next: Vec<_> = events.into_iter().take(5).collect();
        Ok(replies::event_list(
            &next,
            format!("📅 กิจกรรมถัดไป {} รายการ", next.len()),
            role,
        ))
    }

    async fn month(&self, role: Role) -> Result<Reply> {
        let today = dates::today();
        let first = today.with_day(1).unwrap_or(today);
        let last = if today.month() == 12 {
            chrono::NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
        } else {
            chrono::NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
        }
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
        let events = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, Query::Between(first, last)))
            .await?;
        if events.is_empty() {
            return Ok(Reply::menu(
                format!("🗓️ ไม่มีกิจกรรมในเดือน {}/{}", today.month(), today.year()),
                replies::home_menu(role),
            ));
        }
        Ok(replies::event_list(
            &events,
            format!(
                "🗓️ กิจกรรมเดือน {}/{} ทั้งหมด {} รายการ",
                today.month(),
                today.year(),
                events.len()
            ),
            role,
        ))
    }

    /// One-shot search: a date-literal term becomes a date query, anything
    /// else a text query over titles and descriptions.
    pub(super) async fn search_once(&self, term: &str, role: Role) -> Result<Reply> {
        let query = if dates::looks_like_date(term) {
            Query::On(dates::parse_date(term)?)
        } else {
            Query::Text(term.to_string())
        };
        let events = self
            .executor
            .list_entities(Filter::new(EntityKind::Event, query))
            .await?;
        Ok(replies::search_results(term, &events, role))
    }

    async fn list_all(&self, role: Role) -> Result<Reply> {
        let events = self
            .executor
            .list_entities(Filter::all(EntityKind::Event))
            .await?;
        if events.is_empty() {
            return Ok(Reply::menu(
                "ยังไม่มีกิจกรรมในระบบค่ะ\n\nกดปุ่ม 'เพิ่มกิจกรรม' เพื่อเริ่มต้น",
                shared::models::Menu::Admin,
            ));
        }
        Ok(replies::event_list(
            &events,
            format!(
                "📋 กิจกรรมทั้งหมด {} รายการ\n\nใช้ปุ่ม ✏️ แก้ไข หรือ 🗑️ ลบ ในการ์ดแต่ละอัน",
                events.len()
            ),
            role,
        ))
    }

    async fn add_inline(&self, sender: &str, body: &str) -> Result<Reply> {
        let (title, description, date_str) = parse_add_body(body)?;
        let date = dates::parse_date(&date_str)?;
        let mut fields = Fields::new();
        fields.insert(field::TITLE.into(), title.clone());
        fields.insert(field::DESCRIPTION.into(), description.clone());
        fields.insert(field::DATE.into(), date.format(dates::DATE_FORMAT).to_string());
        fields.insert(field::USER_ID.into(), sender.to_string());
        tracing::info!(%title, %date, "inline event create");
        let id = self.executor.create_entity(EntityKind::Event, fields).await?;
        Ok(replies::event_created(
            id,
            &title,
            &description,
            &date.format(dates::DATE_FORMAT).to_string(),
        ))
    }

    async fn edit_inline(&self, body: &str) -> Result<Reply> {
        let parts: Vec<&str> = body.splitn(4, " | ").collect();
        if parts.len() != 4 {
            return Err(Error::validation(
                "รูปแบบ: /edit ID | ชื่อ | รายละเอียด | YYYY-MM-DD",
            ));
        }
        let id = self.parse_event_id(parts[0])?;
        let date = dates::parse_date(parts[3])?;
        let mut fields = Fields::new();
        fields.insert(field::TITLE.into(), parts[1].trim().to_string());
        fields.insert(field::DESCRIPTION.into(), parts[2].trim().to_string());
        fields.insert(field::DATE.into(), date.format(dates::DATE_FORMAT).to_string());
        let updated = self.executor.update_entity(id, fields).await?;
        Ok(replies::event_updated(&updated))
    }

    async fn delete(&self, raw_id: &str) -> Result<Reply> {
        let id = self.parse_event_id(raw_id)?;
        let deleted = self.executor.delete_entity(id).await?;
        tracing::info!(%id, "event deleted");
        Ok(replies::event_deleted(&deleted))
    }

    async fn delete_request(&self, raw_id: &str) -> Result<Reply> {
        let entity = self.fetch_event(raw_id).await?;
        Ok(replies::delete_confirmation(&entity))
    }

    pub(super) async fn notify_now(&self, message: &str) -> Result<Reply> {
        let report = self
            .executor
            .broadcast(message, Audience::Subscribers)
            .await?;
        Ok(replies::broadcast_done(message, report))
    }

    async fn add_contact(&self, sender: &str, args: &str) -> Result<Reply> {
        let parts: Vec<&str> = args.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(Error::validation(
                "กรุณาใส่ข้อมูลครบ\n\n💡 รูปแบบ: เพิ่มเบอร์ ชื่อ เบอร์โทร\n🔤 ตัวอย่าง: เพิ่มเบอร์ สมชาย 081-234-5678",
            ));
        }
        // the phone number is the last word, everything before it is the name
        let name = parts[..parts.len() - 1].join(" ");
        let Some(phone) = phone::normalize(parts[parts.len() - 1]) else {
            return Err(Error::validation(
                "เบอร์โทรไม่ถูกต้องค่ะ ลองตรวจสอบเบอร์โทรให้ถูกต้อง",
            ));
        };
        let mut fields = Fields::new();
        fields.insert(field::NAME.into(), name.clone());
        fields.insert(field::PHONE.into(), phone.clone());
        fields.insert(field::USER_ID.into(), sender.to_string());
        self.executor
            .create_entity(EntityKind::Contact, fields)
            .await?;
        Ok(replies::contact_saved(&name, &phone))
    }

    async fn find_contacts(&self, query: &str, role: Role) -> Result<Reply> {
        let keywords: Vec<String> = query.split_whitespace().map(String::from).collect();
        let contacts = self
            .executor
            .list_entities(Filter::new(EntityKind::Contact, Query::Keywords(keywords)))
            .await?;
        if contacts.is_empty() {
            return Ok(Reply::menu(
                "❌ ไม่พบข้อมูลที่ตรงกับคำค้นหา\n\n💡 ลองใช้คำค้นหาอื่น เช่น บางส่วนของชื่อ หรือเลขเบอร์",
                shared::models::Menu::Contacts,
            ));
        }
        Ok(Reply::menu(
            format!("🔍 พบ {} รายการ", contacts.len()),
            replies::home_menu(role),
        )
        .with_payload(replies::contact_payload(&contacts)))
    }

    async fn list_contacts(&self) -> Result<Reply> {
        let contacts = self
            .executor
            .list_entities(Filter::all(EntityKind::Contact))
            .await?;
        if contacts.is_empty() {
            return Ok(Reply::menu(
                "ยังไม่มีเบอร์ที่บันทึกไว้ค่ะ\n\n💡 เพิ่มเบอร์: เพิ่มเบอร์ ชื่อ เบอร์โทร",
                shared::models::Menu::Contacts,
            ));
        }
        Ok(Reply::menu(
            format!("📞 เบอร์ทั้งหมด {} รายการ", contacts.len()),
            shared::models::Menu::Contacts,
        )
        .with_payload(replies::contact_payload(&contacts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_body_pipe_form() {
        let (t, d, date) = parse_add_body("งานบุญ | ที่วัดหน้าบ้าน | 2025-09-01").unwrap();
        assert_eq!(t, "งานบุญ");
        assert_eq!(d, "ที่วัดหน้าบ้าน");
        assert_eq!(date, "2025-09-01");
    }

    #[test]
    fn add_body_detects_date_word() {
        let (t, d, date) = parse_add_body("บัตรตำรวจ 2025-08-08 อยู่ที่กระเป๋า").unwrap();
        assert_eq!(date, "2025-08-08");
        assert_eq!(t, "บัตรตำรวจ");
        assert_eq!(d, "อยู่ที่กระเป๋า");
    }

    #[test]
    fn add_body_falls_back_to_trailing_words() {
        let (t, d, date) = parse_add_body("ประชุม ทีมงาน พรุ่งนี้").unwrap();
        assert_eq!(t, "ประชุม");
        assert_eq!(d, "ทีมงาน");
        assert_eq!(date, "พรุ่งนี้");
    }

    #[test]
    fn add_body_too_short_is_validation_error() {
        assert!(matches!(
            parse_add_body("งานบุญ"),
            Err(Error::Validation(_))
        ));
    }
}
