use serde_json::json;

use shared::models::Reply;

use crate::aliases::canonical;

/// A recognized command that arrived without its arguments: explanatory
/// text plus a handful of example completions for the renderer to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteCommand {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Runs on the canonical text right after normalization and before any
/// routing; a hit short-circuits the router entirely.
pub fn detect(canonical_text: &str) -> Option<IncompleteCommand> {
    match canonical_text {
        canonical::ADD_PHONE => Some(IncompleteCommand {
            message: "📝 กรุณาใส่ข้อมูลเพิ่มเติม\n\n💡 รูปแบบ: เพิ่มเบอร์ ชื่อ เบอร์โทร\n🔤 ตัวอย่าง: เพิ่มเบอร์ สมชาย 081-234-5678".into(),
            suggestions: vec![
                "เพิ่มเบอร์ สมชาย 081-234-5678".into(),
                "เพิ่มเบอร์ นางสาวดาว 089-999-8888".into(),
            ],
        }),
        canonical::SEARCH_PHONE => Some(IncompleteCommand {
            message: "🔍 กรุณาใส่คำค้นหา\n\n💡 สามารถค้นหาได้:\n• ชื่อ: หาเบอร์ สมชาย\n• เบอร์: หาเบอร์ 081\n• หลายคำ: หาเบอร์ สมชาย 081".into(),
            suggestions: vec![
                "หาเบอร์ สมชาย".into(),
                "หาเบอร์ 081".into(),
                "หาเบอร์ คุณ".into(),
            ],
        }),
        _ => None,
    }
}

impl IncompleteCommand {
    pub fn into_reply(self) -> Reply {
        let payload = json!({ "suggestions": self.suggestions });
        Reply::plain(self.message).with_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::AliasTable;

    #[test]
    fn bare_canonical_prefixes_are_incomplete() {
        assert!(detect("add_phone").is_some());
        assert!(detect("search_phone").is_some());
    }

    #[test]
    fn complete_commands_pass() {
        assert!(detect("add_phone สมชาย 081-234-5678").is_none());
        assert!(detect("search_phone 081").is_none());
        assert!(detect("/today").is_none());
    }

    #[test]
    fn suggestion_counts_stay_small() {
        for text in ["add_phone", "search_phone"] {
            let found = detect(text).unwrap();
            assert!((2..=10).contains(&found.suggestions.len()));
        }
    }

    #[test]
    fn triggered_by_argument_less_alias() {
        let table = AliasTable::default();
        let canonical = table.normalize("เพิ่มเบอร์");
        assert!(detect(&canonical).is_some());
    }
}
