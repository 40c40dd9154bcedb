//! Recording filename conventions.
//!
//! Export pipelines stamp recordings as
//! `<marker>_<marker>_<Event_Name>_<YYYYMMDD>_<HHMMSS>.wav` (for example
//! `audio_only_Weekly_Sync_20240115_093000.wav`). This module parses that
//! convention into an [`EventIdentity`] and derives the per-recording output
//! directory name from it. Stems that do not match the convention fall back
//! to the bare stem.

use chrono::NaiveDate;

/// Event title and date recovered from a structured recording stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIdentity {
    pub title: String,
    pub date: NaiveDate,
}

/// Parse the structured naming convention out of a recording stem.
///
/// The stem must have at least 6 underscore-delimited tokens: two leading
/// marker tokens, one or more title tokens, an 8-digit calendar date and a
/// 6-digit time. Anything else (too few tokens, non-numeric or invalid
/// date/time tokens) yields `None` and the caller falls back to the stem.
pub fn parse_event_identity(stem: &str) -> Option<EventIdentity> {
    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() < 6 {
        return None;
    }

    let date_token = tokens[tokens.len() - 2];
    let time_token = tokens[tokens.len() - 1];
    if date_token.len() != 8 || !date_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if time_token.len() != 6 || !time_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_token, "%Y%m%d").ok()?;
    let title = tokens[2..tokens.len() - 2].join("_");

    Some(EventIdentity { title, date })
}

/// Derive the output directory name for a recording stem.
///
/// Structured stems map to `"<title>_<YYYY-MM-DD>"`; everything else maps to
/// the stem itself. The result is sanitized so that a hostile or accidental
/// path separator in a title token cannot escape the output base directory.
pub fn output_directory_name(stem: &str) -> String {
    match parse_event_identity(stem) {
        Some(identity) => sanitize_component(&format!(
            "{}_{}",
            identity.title,
            identity.date.format("%Y-%m-%d")
        )),
        None => sanitize_component(stem),
    }
}

/// Replace path separators, reserved filesystem characters, and control
/// characters with `_` so the result is always a single safe path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
