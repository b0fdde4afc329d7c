use chrono::{Datelike, FixedOffset, NaiveDate, Utc};

use shared::{Error, Result};

/// The one calendar format every date in the system uses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| Error::validation("รูปแบบวันที่ไม่ถูกต้องค่ะ กรุณาใช้ YYYY-MM-DD"))
}

pub fn looks_like_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).is_ok()
}

/// Day + Thai month name + Buddhist-era year, e.g. "8 สิงหาคม 2568".
pub fn format_thai(date_str: &str) -> String {
    match NaiveDate::parse_from_str(date_str, DATE_FORMAT) {
        Ok(date) => format!(
            "{} {} {}",
            date.day(),
            THAI_MONTHS[date.month0() as usize],
            date.year() + 543
        ),
        Err(_) => date_str.to_string(),
    }
}

/// Current date in Bangkok time, where the bot's audience lives.
pub fn today() -> NaiveDate {
    let bangkok = FixedOffset::east_opt(7 * 60 * 60).expect("fixed offset");
    Utc::now().with_timezone(&bangkok).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_format_only() {
        assert!(parse_date("2025-08-08").is_ok());
        assert!(parse_date(" 2025-08-08 ").is_ok());
        assert!(parse_date("08-08-2025").is_err());
        assert!(parse_date("2025/08/08").is_err());
        assert!(parse_date("พรุ่งนี้").is_err());
    }

    #[test]
    fn formats_buddhist_era() {
        assert_eq!(format_thai("2025-08-08"), "8 สิงหาคม 2568");
        assert_eq!(format_thai("2025-01-01"), "1 มกราคม 2568");
    }

    #[test]
    fn format_falls_back_to_input() {
        assert_eq!(format_thai("soon"), "soon");
    }
}
