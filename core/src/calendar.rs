//! iCalendar export for the event.
//!
//! Renders one fixed VEVENT as a complete `.ics` document. TEXT values are
//! escaped and every content line is folded per RFC 5545 §3.1: no physical
//! line exceeds 75 octets, continuation lines start with a single space, and
//! lines are separated by CRLF.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum octets per physical line, excluding the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

const CRLF: &str = "\r\n";
const FOLD: &str = "\r\n ";

/// The event described by the calendar export.
///
/// Independent of stored RSVPs. The default is the event the service was
/// built for; deployments override fields from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Stable UID so re-imports update the same calendar entry.
    pub uid: String,
    /// `SUMMARY`.
    pub title: String,
    /// Local start time (floating, no TZID).
    pub start: NaiveDateTime,
    /// Local end time (floating, no TZID).
    pub end: NaiveDateTime,
    /// IANA zone name advertised through `X-WR-TIMEZONE`.
    pub timezone: String,
    /// `LOCATION`.
    pub location: String,
    /// `DESCRIPTION`; may contain newlines.
    pub description: String,
    /// `URL`.
    pub url: String,
    /// `X-WR-CALNAME`.
    pub calendar_name: String,
    /// `X-WR-CALDESC`.
    pub calendar_description: String,
    /// `PRODID`.
    pub product_id: String,
    /// Download filename for the attachment.
    pub filename: String,
}

fn local_time(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            uid: "baby-shower-2026@babyshower-rsvp".to_string(),
            title: "Tiffany's Baby Shower - Dua & Celebration".to_string(),
            start: local_time(2026, 2, 15, 13),
            end: local_time(2026, 2, 15, 17),
            timezone: "America/Chicago".to_string(),
            location: "209 James River Drive, Hutto, TX 78634".to_string(),
            description: "Join us for a beautiful celebration of the Baby Shaad (shower) tradition!\n\
                          Dua and blessings for the mother and baby."
                .to_string(),
            url: "https://babyshower.deviantbd.com".to_string(),
            calendar_name: "Baby Shower".to_string(),
            calendar_description: "Join us for the Baby Shower celebration".to_string(),
            product_id: "-//Baby Shower RSVP//EN".to_string(),
            filename: "Baby-Shower-2026.ics".to_string(),
        }
    }
}

/// Render `event` as an iCalendar document stamped with `dtstamp`.
///
/// The result ends with CRLF.
#[must_use]
pub fn render_calendar(event: &EventDetails, dtstamp: DateTime<Utc>) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", event.product_id),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(&event.calendar_name)),
        format!("X-WR-TIMEZONE:{}", event.timezone),
        format!("X-WR-CALDESC:{}", escape_text(&event.calendar_description)),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", event.uid),
        format!("DTSTAMP:{}", dtstamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART:{}", event.start.format("%Y%m%dT%H%M%S")),
        format!("DTEND:{}", event.end.format("%Y%m%dT%H%M%S")),
        format!("SUMMARY:{}", escape_text(&event.title)),
        format!("LOCATION:{}", escape_text(&event.location)),
        format!("DESCRIPTION:{}", escape_text(&event.description)),
        format!("URL:{}", event.url),
        "STATUS:CONFIRMED".to_string(),
        "SEQUENCE:0".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut document = String::new();
    for line in &lines {
        document.push_str(&fold_line(line));
        document.push_str(CRLF);
    }
    document
}

/// Escape an iCalendar TEXT value.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Fold one content line.
///
/// The first segment holds at most 75 octets, each continuation a space plus
/// at most 74 octets. Splits fall on UTF-8 character boundaries.
///
/// # Examples
///
/// ```
/// use rsvp_core::{fold_line, unfold};
///
/// let line = format!("DESCRIPTION:{}", "x".repeat(100));
/// let folded = fold_line(&line);
/// assert!(folded.split("\r\n").all(|l| l.len() <= 75));
/// assert_eq!(unfold(&folded), line);
/// ```
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / (MAX_LINE_OCTETS - 1) * FOLD.len());
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;

    while !rest.is_empty() {
        let mut cut = limit.min(rest.len());
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }

        if limit < MAX_LINE_OCTETS {
            folded.push_str(FOLD);
        }
        folded.push_str(&rest[..cut]);
        rest = &rest[cut..];
        // room for the leading space
        limit = MAX_LINE_OCTETS - 1;
    }

    folded
}

/// Undo [`fold_line`] on a whole document or a single folded line.
#[must_use]
pub fn unfold(text: &str) -> String {
    text.replace(FOLD, "").replace("\r\n\t", "")
}
