use serde::Deserialize;

/// Canonical command prefixes the alias families rewrite to.
pub mod canonical {
    pub const ADD_PHONE: &str = "add_phone";
    pub const SEARCH_PHONE: &str = "search_phone";
}

/// One locale-specific prefix family mapping to a canonical prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasFamily {
    pub patterns: Vec<String>,
    pub canonical: String,
}

/// Ordered table of (pattern, canonical-prefix) pairs. The first matching
/// pattern wins; resolution is by declaration order, NOT longest-match, so
/// multi-word synonyms must be declared ahead of the short generic ones
/// they contain ("หาเบอร์" before "หา").
#[derive(Debug, Clone, Deserialize)]
pub struct AliasTable {
    families: Vec<AliasFamily>,
}

/// Complete commands and menu phrases that begin with an alias prefix;
/// never rewritten.
const RESERVED: [&str; 4] = [
    "เบอร์ทั้งหมด",
    "ค้นหาข้อความ",
    "ค้นหาวันที่",
    "ค้นหาทั้งหมด",
];

impl Default for AliasTable {
    fn default() -> Self {
        let family = |patterns: &[&str], canonical: &str| AliasFamily {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            canonical: canonical.to_string(),
        };
        Self {
            families: vec![
                family(
                    &[
                        "เพิ่มเบอร์",
                        "บันทึกเบอร์",
                        "เพิ่มชื่อ",
                        "บันทึกชื่อ",
                        "เพิ่มคนใหม่",
                        "เก็บเบอร์",
                    ],
                    canonical::ADD_PHONE,
                ),
                family(
                    &[
                        "หาเบอร์",
                        "ค้นหา",
                        "หาชื่อ",
                        "เบอร์ของ",
                        "ชื่อ",
                        "เบอร์",
                        "หา",
                    ],
                    canonical::SEARCH_PHONE,
                ),
            ],
        }
    }
}

impl AliasTable {
    /// Rewrite free-form locale text into its canonical command string.
    ///
    /// An empty remainder after a matched prefix yields the bare canonical
    /// prefix, which downstream signals "recognized but incomplete". Text
    /// matching no family is returned unchanged, so the function is
    /// idempotent on already-canonical input.
    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if RESERVED.contains(&trimmed) {
            return trimmed.to_string();
        }
        let lowered = trimmed.to_lowercase();
        for family in &self.families {
            for pattern in &family.patterns {
                if let Some(rest) = lowered.strip_prefix(&pattern.to_lowercase()) {
                    let rest = rest.trim();
                    if rest.is_empty() {
                        return family.canonical.clone();
                    }
                    return format!("{} {}", family.canonical, rest);
                }
            }
        }
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_add_family() {
        let table = AliasTable::default();
        assert_eq!(
            table.normalize("เพิ่มเบอร์ สมชาย 081-234-5678"),
            "add_phone สมชาย 081-234-5678"
        );
        assert_eq!(
            table.normalize("เก็บเบอร์ คุณแม่ 02-123-4567"),
            "add_phone คุณแม่ 02-123-4567"
        );
    }

    #[test]
    fn rewrites_search_family() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("หาเบอร์ สมชาย"), "search_phone สมชาย");
        assert_eq!(table.normalize("เบอร์ของ ดาว"), "search_phone ดาว");
        assert_eq!(table.normalize("หา สมชาย 081"), "search_phone สมชาย 081");
    }

    #[test]
    fn empty_remainder_gives_bare_canonical() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("เพิ่มเบอร์"), "add_phone");
        assert_eq!(table.normalize("หาเบอร์ "), "search_phone");
    }

    #[test]
    fn declaration_order_beats_longest_match() {
        // "หาเบอร์" is declared before the generic "หา"; the specific
        // family must claim the text even though both prefixes match.
        let table = AliasTable::default();
        assert_eq!(table.normalize("หาเบอร์ 081"), "search_phone 081");
        // the one-word generic still works on its own
        assert_eq!(table.normalize("หา 081"), "search_phone 081");
    }

    #[test]
    fn reserved_phrases_are_not_rewritten() {
        // "เบอร์ทั้งหมด" starts with the generic "เบอร์" prefix but is a
        // complete command of its own
        let table = AliasTable::default();
        assert_eq!(table.normalize("เบอร์ทั้งหมด"), "เบอร์ทั้งหมด");
        assert_eq!(table.normalize("ค้นหาวันที่"), "ค้นหาวันที่");
    }

    #[test]
    fn unknown_text_passes_through() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("/today"), "/today");
        assert_eq!(table.normalize("สวัสดี"), "สวัสดี");
    }

    #[test]
    fn idempotent_on_canonical_text() {
        let table = AliasTable::default();
        let once = table.normalize("เพิ่มเบอร์ สมชาย 081-234-5678");
        assert_eq!(table.normalize(&once), once);
        assert_eq!(table.normalize("add_phone x 081"), "add_phone x 081");
    }

    #[test]
    fn latin_prefixes_match_case_insensitively() {
        let mut table = AliasTable::default();
        table.families.push(AliasFamily {
            patterns: vec!["add contact".into()],
            canonical: canonical::ADD_PHONE.into(),
        });
        assert_eq!(table.normalize("Add Contact joe 081"), "add_phone joe 081");
    }
}
