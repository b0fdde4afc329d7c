use shared::models::Role;

use crate::aliases::canonical;

/// Cancellation keywords; checked before anything else touches a session.
pub const CANCEL_WORDS: [&str; 2] = ["สวัสดี", "ยกเลิก"];

pub fn is_cancel(text: &str) -> bool {
    CANCEL_WORDS.contains(&text.trim())
}

/// A stateless command: fully specified in one message, dispatched
/// straight to the executor. Argument fields hold raw text; format
/// validation happens in the handler so a recognized-but-malformed command
/// yields a corrective reply instead of falling through to the help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "สวัสดี" — greeting, doubles as the way back to the main menu
    Greeting,
    /// "ล่าสุด [page]" — recent events, paged
    Recent { page: u32 },
    /// "/subscribe"
    Subscribe,
    /// "/today"
    Today,
    /// "/next"
    Upcoming,
    /// "/month"
    Month,
    /// "/search <term>"
    SearchQuery { term: String },
    /// "/admin"
    AdminMenu,
    /// "/list"
    ListEvents,
    /// "จัดการกิจกรรม" — management listing with edit/delete affordances
    ManageEvents,
    /// "/add <body>" or the bare "title | description | date" shorthand
    AddInline { body: String },
    /// "/edit <id | title | description | date>"
    EditInline { body: String },
    /// "/delete <id>"
    Delete { id: String },
    /// "ลบ <id>" — asks for confirmation, creates no session
    DeleteRequest { id: String },
    /// "ยืนยันลบ <id>"
    ConfirmDelete { id: String },
    /// "/notify <message>"
    Notify { message: String },
    /// canonical "add_phone <name…> <phone>"
    AddContact { args: String },
    /// canonical "search_phone <keywords…>"
    FindContact { query: String },
    /// "เบอร์ทั้งหมด" and synonyms
    ListContacts,
    /// "วิธีใช้เบอร์" and synonyms
    ContactHelp,
}

/// Text that starts a guided multi-turn flow instead of completing in one
/// message. Evaluated after stateless commands, per the fixed precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEntry {
    /// "เพิ่มกิจกรรม"
    AddEvent,
    /// bare "/search"
    Search,
    /// "ส่งแจ้งเตือน"
    Notify,
    /// "แก้ไข <id>"
    EditEvent { id: String },
}

const LIST_CONTACT_WORDS: [&str; 4] = ["เบอร์ทั้งหมด", "ทั้งหมด", "ดูทั้งหมด", "รายการทั้งหมด"];
const CONTACT_HELP_WORDS: [&str; 3] = ["วิธีใช้เบอร์", "ช่วยเหลือเบอร์", "help เบอร์"];

impl Command {
    /// Match canonical text against the fixed stateless signatures, in
    /// declaration order. Prefix forms are tested before their bare forms
    /// so "/search x" and "/search" cannot shadow one another.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        if text == "สวัสดี" {
            return Some(Command::Greeting);
        }
        if let Some(rest) = text.strip_prefix("ล่าสุด") {
            let page = rest.trim().parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1);
            return Some(Command::Recent { page });
        }
        if text == "/subscribe" {
            return Some(Command::Subscribe);
        }
        if let Some(rest) = text.strip_prefix("/add ") {
            return Some(Command::AddInline {
                body: rest.trim().to_string(),
            });
        }
        if text == "/today" {
            return Some(Command::Today);
        }
        if text == "/next" {
            return Some(Command::Upcoming);
        }
        if text == "/month" {
            return Some(Command::Month);
        }
        if let Some(rest) = text.strip_prefix("/search ") {
            let term = rest.trim();
            if !term.is_empty() {
                return Some(Command::SearchQuery {
                    term: term.to_string(),
                });
            }
        }
        if text == "/admin" {
            return Some(Command::AdminMenu);
        }
        if text == "/list" {
            return Some(Command::ListEvents);
        }
        if text == "จัดการกิจกรรม" {
            return Some(Command::ManageEvents);
        }
        if let Some(rest) = text.strip_prefix("/edit ") {
            return Some(Command::EditInline {
                body: rest.trim().to_string(),
            });
        }
        if let Some(rest) = text.strip_prefix("/delete ") {
            return Some(Command::Delete {
                id: rest.trim().to_string(),
            });
        }
        // confirmation prefix is longer, so it is tested before "ลบ "
        if let Some(rest) = text.strip_prefix("ยืนยันลบ ") {
            return Some(Command::ConfirmDelete {
                id: rest.trim().to_string(),
            });
        }
        if let Some(rest) = text.strip_prefix("ลบ ") {
            return Some(Command::DeleteRequest {
                id: rest.trim().to_string(),
            });
        }
        if let Some(rest) = text.strip_prefix("/notify ") {
            return Some(Command::Notify {
                message: rest.trim().to_string(),
            });
        }
        if let Some(rest) = text.strip_prefix(canonical::ADD_PHONE) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(Command::AddContact {
                    args: rest.to_string(),
                });
            }
        }
        if let Some(rest) = text.strip_prefix(canonical::SEARCH_PHONE) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(Command::FindContact {
                    query: rest.to_string(),
                });
            }
        }
        if LIST_CONTACT_WORDS.contains(&text) {
            return Some(Command::ListContacts);
        }
        if CONTACT_HELP_WORDS.contains(&text) {
            return Some(Command::ContactHelp);
        }
        // admin shorthand: one message carrying all three event fields
        if text.split(" | ").count() == 3 {
            return Some(Command::AddInline {
                body: text.to_string(),
            });
        }
        None
    }

    /// Declarative role gate, consulted once by the router before dispatch.
    pub fn role_required(&self) -> Role {
        match self {
            Command::AdminMenu
            | Command::ListEvents
            | Command::ManageEvents
            | Command::AddInline { .. }
            | Command::EditInline { .. }
            | Command::Delete { .. }
            | Command::DeleteRequest { .. }
            | Command::ConfirmDelete { .. }
            | Command::Notify { .. } => Role::Admin,
            _ => Role::User,
        }
    }
}

impl FlowEntry {
    pub fn parse(text: &str) -> Option<FlowEntry> {
        let text = text.trim();
        match text {
            "เพิ่มกิจกรรม" => return Some(FlowEntry::AddEvent),
            "/search" => return Some(FlowEntry::Search),
            "ส่งแจ้งเตือน" => return Some(FlowEntry::Notify),
            _ => {}
        }
        if let Some(rest) = text.strip_prefix("แก้ไข ") {
            return Some(FlowEntry::EditEvent {
                id: rest.trim().to_string(),
            });
        }
        None
    }

    pub fn role_required(&self) -> Role {
        match self {
            FlowEntry::Search => Role::User,
            _ => Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_words_are_fixed() {
        assert!(is_cancel("ยกเลิก"));
        assert!(is_cancel(" สวัสดี "));
        assert!(!is_cancel("ยกเลิกนัด"));
    }

    #[test]
    fn search_with_term_is_stateless_bare_is_flow_entry() {
        assert_eq!(
            Command::parse("/search งานบุญ"),
            Some(Command::SearchQuery {
                term: "งานบุญ".into()
            })
        );
        assert_eq!(Command::parse("/search"), None);
        assert_eq!(FlowEntry::parse("/search"), Some(FlowEntry::Search));
    }

    #[test]
    fn confirm_delete_wins_over_delete_request() {
        // both families share the "ลบ" literal; precedence must pick one
        // deterministic winner
        assert_eq!(
            Command::parse("ยืนยันลบ 42"),
            Some(Command::ConfirmDelete { id: "42".into() })
        );
        assert_eq!(
            Command::parse("ลบ 42"),
            Some(Command::DeleteRequest { id: "42".into() })
        );
    }

    #[test]
    fn recent_parses_optional_page() {
        assert_eq!(Command::parse("ล่าสุด"), Some(Command::Recent { page: 1 }));
        assert_eq!(Command::parse("ล่าสุด 3"), Some(Command::Recent { page: 3 }));
        assert_eq!(Command::parse("ล่าสุด x"), Some(Command::Recent { page: 1 }));
    }

    #[test]
    fn shorthand_requires_three_pipe_parts() {
        assert!(matches!(
            Command::parse("งานบุญ | ที่วัด | 2025-09-01"),
            Some(Command::AddInline { .. })
        ));
        assert_eq!(Command::parse("งานบุญ | 2025-09-01"), None);
    }

    #[test]
    fn bare_canonical_prefixes_do_not_parse() {
        // those belong to the incomplete-command path
        assert_eq!(Command::parse("add_phone"), None);
        assert_eq!(Command::parse("search_phone"), None);
    }

    #[test]
    fn admin_gate_is_declarative() {
        assert_eq!(
            Command::parse("/delete 42").unwrap().role_required(),
            Role::Admin
        );
        assert_eq!(
            Command::parse("/notify สวัสดีทุกคน").unwrap().role_required(),
            Role::Admin
        );
        assert_eq!(Command::parse("/today").unwrap().role_required(), Role::User);
        assert_eq!(
            Command::parse("add_phone สมชาย 0812345678")
                .unwrap()
                .role_required(),
            Role::User
        );
    }

    #[test]
    fn flow_entries_parse() {
        assert_eq!(FlowEntry::parse("เพิ่มกิจกรรม"), Some(FlowEntry::AddEvent));
        assert_eq!(FlowEntry::parse("ส่งแจ้งเตือน"), Some(FlowEntry::Notify));
        assert_eq!(
            FlowEntry::parse("แก้ไข 7d"),
            Some(FlowEntry::EditEvent { id: "7d".into() })
        );
        assert_eq!(FlowEntry::parse("อะไรนะ"), None);
    }
}
