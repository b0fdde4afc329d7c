use regex::Regex;
use std::sync::OnceLock;

fn mobile_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0[689]\d{8}$").expect("mobile pattern"))
}

fn landline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0[2-7]\d{7,8}$").expect("landline pattern"))
}

/// Validate a Thai phone number and return its canonical dashed form, or
/// `None` when the input is not a phone number at all. Spaces, dashes and
/// parentheses are ignored on input.
pub fn normalize(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !mobile_re().is_match(&digits) && !landline_re().is_match(&digits) {
        return None;
    }
    match digits.len() {
        10 => Some(format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..])),
        9 => Some(format!("{}-{}-{}", &digits[..2], &digits[2..5], &digits[5..])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mobile_numbers() {
        assert_eq!(normalize("0812345678"), Some("081-234-5678".into()));
        assert_eq!(normalize("081-234-5678"), Some("081-234-5678".into()));
        assert_eq!(normalize("(089) 999 8888"), Some("089-999-8888".into()));
    }

    #[test]
    fn accepts_landline_numbers() {
        assert_eq!(normalize("021234567"), Some("02-123-4567".into()));
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize("12345").is_none());
        assert!(normalize("abcdefghij").is_none());
        assert!(normalize("1812345678").is_none());
        assert!(normalize("").is_none());
    }
}
