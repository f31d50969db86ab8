//! CSV export of the contact-message inbox.
//!
//! The file starts with a UTF-8 byte-order mark so spreadsheet software
//! detects the encoding (the Arabic labels depend on it). Subject and
//! message are always quoted; embedded quotes are doubled.

use crate::types::{DbId, Timestamp};

/// UTF-8 byte-order mark prefixed to every export.
pub const UTF8_BOM: char = '\u{feff}';

/// Rows are terminated CRLF.
const LINE_END: &str = "\r\n";

/// Label set used for the header row and the read flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportLocale {
    #[default]
    En,
    Ar,
}

impl ExportLocale {
    /// Parse a `lang` query value. Anything other than `ar` means English.
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("ar") => Self::Ar,
            _ => Self::En,
        }
    }

    pub fn header(&self) -> [&'static str; 7] {
        match self {
            Self::En => ["Id", "Subject", "Email", "Message", "Date", "Time", "Read"],
            Self::Ar => [
                "الرقم",
                "الموضوع",
                "البريد الإلكتروني",
                "الرسالة",
                "التاريخ",
                "الوقت",
                "مقروءة",
            ],
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::En, true) => "Yes",
            (Self::En, false) => "No",
            (Self::Ar, true) => "نعم",
            (Self::Ar, false) => "لا",
        }
    }
}

/// Borrowed view of one message for export.
#[derive(Debug, Clone, Copy)]
pub struct CsvMessage<'a> {
    pub id: DbId,
    pub subject: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub created_at: Timestamp,
    pub is_read: bool,
}

/// Wrap a value in quotes, doubling any embedded quote.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote only when the value would otherwise break the row.
fn escape_plain(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Render a single data row (without line terminator).
pub fn format_row(row: &CsvMessage<'_>, locale: ExportLocale) -> String {
    [
        row.id.to_string(),
        quote(row.subject),
        escape_plain(row.email),
        quote(row.message),
        row.created_at.format("%Y-%m-%d").to_string(),
        row.created_at.format("%H:%M").to_string(),
        locale.yes_no(row.is_read).to_string(),
    ]
    .join(",")
}

/// Build the complete export document: BOM, header, one line per message.
pub fn build_messages_csv(rows: &[CsvMessage<'_>], locale: ExportLocale) -> String {
    let mut out = String::new();
    out.push(UTF8_BOM);
    out.push_str(&locale.header().join(","));
    out.push_str(LINE_END);
    for row in rows {
        out.push_str(&format_row(row, locale));
        out.push_str(LINE_END);
    }
    out
}

/// Download file name for an export generated at `now`.
pub fn export_file_name(now: Timestamp) -> String {
    format!("messages_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2026, 4, 2, h, m, 0).unwrap()
    }

    #[test]
    fn export_starts_with_bom_and_header() {
        let csv = build_messages_csv(&[], ExportLocale::En);
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(csv.as_bytes()[..3], [0xEF, 0xBB, 0xBF]);
        assert_eq!(
            csv.trim_start_matches(UTF8_BOM),
            "Id,Subject,Email,Message,Date,Time,Read\r\n"
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = [
            CsvMessage {
                id: 1,
                subject: "Hello",
                email: "a@b.com",
                message: "plain",
                created_at: at(9, 5),
                is_read: true,
            },
            CsvMessage {
                id: 2,
                subject: "Quote",
                email: "c@d.com",
                message: "She said \"hi\", twice",
                created_at: at(17, 45),
                is_read: false,
            },
        ];
        let csv = build_messages_csv(&rows, ExportLocale::En);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[1], "1,\"Hello\",a@b.com,\"plain\",2026-04-02,09:05,Yes");
        assert_eq!(
            lines[2],
            "2,\"Quote\",c@d.com,\"She said \"\"hi\"\", twice\",2026-04-02,17:45,No"
        );
        assert_eq!(lines[3], "");
    }

    #[test]
    fn arabic_locale_uses_localized_labels() {
        let row = CsvMessage {
            id: 7,
            subject: "s",
            email: "e@x.org",
            message: "m",
            created_at: at(0, 0),
            is_read: true,
        };
        let csv = build_messages_csv(&[row], ExportLocale::from_key(Some("AR")));
        assert!(csv.contains("الرقم,الموضوع"));
        assert!(csv.trim_end().ends_with("نعم"));
        assert_eq!(ExportLocale::Ar.yes_no(false), "لا");
    }

    #[test]
    fn unknown_lang_falls_back_to_english() {
        assert_eq!(ExportLocale::from_key(Some("fr")), ExportLocale::En);
        assert_eq!(ExportLocale::from_key(None), ExportLocale::En);
    }

    #[test]
    fn file_name_carries_timestamp() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 1, 9, 8, 7, 6).unwrap();
        assert_eq!(export_file_name(now), "messages_20260109_080706.csv");
    }
}
