//! Golestan dialect: the second course-catalog export layout.
//!
//! Fourteen columns; one cell (column N) holds either a session
//! description, an exam description or nothing, distinguished by its text
//! prefix. A section's time blocks arrive split across many rows, so every
//! parsed session goes through [`merge_session`]: back-to-back blocks are
//! coalesced and odd/even duplicates of the same slot are reconciled into
//! an every-week session.
//!
//! An auxiliary "field lesson" worksheet supplies a course-id to credit
//! mapping ([`credit_rows`]) used to backfill records whose main sheet has
//! no credit column value.

use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{cell_int, cell_num, cell_str, cell_text, is_blank, parse_time, Assigner, RowMapper, EMPTY_CELL};
use crate::models::{ClassInfo, DayOfWeek, Epoch, Exam, Session, WeekParity};
use crate::text::normalize;

/// Physical column count of a Golestan worksheet.
pub const SHEET_WIDTH: usize = 14;

static TIME_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{2}:[0-9]{2}-[0-9]{2}:[0-9]{2}").unwrap());
static EXAM_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}\.[0-9]{2}\.[0-9]{2}").unwrap());

/// Prefixes marking column N as a lesson or problem-solving session.
const SESSION_PREFIXES: [&str; 2] = ["درس", "حل"];
/// Prefix marking column N as an exam.
const EXAM_PREFIX: &str = "امتحان";
/// Label introducing the place suffix after a time span.
const PLACE_LABEL: &str = "مکان:";

/// Column table: campus id, campus, (ignored x2), composite
/// `courseId_classId`, title, credit, (ignored), capacity, reserved count,
/// (ignored x2), teacher, session-or-exam.
static ASSIGNERS: [Option<Assigner>; 14] = [
    Some(set_campus_id),
    Some(set_campus),
    None,
    None,
    Some(set_composite_id),
    Some(set_course_title),
    Some(set_credit),
    None,
    Some(set_capacity),
    Some(subtract_reserved),
    None,
    None,
    Some(push_teacher),
    Some(set_meeting),
];

pub static MAPPER: RowMapper = RowMapper { assigners: &ASSIGNERS, row_key };

/// Rows merge on the raw composite `courseId_classId` cell (column E).
fn row_key(row: &[Data]) -> Option<String> {
    let key = cell_text(&row[4]);
    (!key.is_empty()).then_some(key)
}

fn set_campus_id(cell: &Data, o: &mut ClassInfo) {
    o.campus_id = cell_int(cell);
}

fn set_campus(cell: &Data, o: &mut ClassInfo) {
    let text = cell_text(cell);
    o.campus = if text.is_empty() { EMPTY_CELL.to_string() } else { normalize(&text) };
}

/// Column E is `courseId_classId`; the section id is the two halves
/// concatenated into one number.
fn set_composite_id(cell: &Data, o: &mut ClassInfo) {
    let Some(raw) = cell_str(cell) else { return };
    let mut halves = raw.trim().splitn(2, '_');
    let course = halves.next().unwrap_or("").trim();
    let class = halves.next().unwrap_or("").trim();
    o.course_id = course.parse().unwrap_or(0);
    o.id = format!("{course}{class}").parse().unwrap_or(0);
}

fn set_course_title(cell: &Data, o: &mut ClassInfo) {
    let text = cell_text(cell);
    o.course_title = if text.is_empty() { EMPTY_CELL.to_string() } else { normalize(&text) };
}

/// Credit is only taken when the cell actually parses; an empty cell leaves
/// `None` so the credit cache can backfill it after the parse.
fn set_credit(cell: &Data, o: &mut ClassInfo) {
    match cell {
        Data::Int(i) => o.credit = Some(*i as f64),
        Data::Float(f) => o.credit = Some(*f),
        Data::String(s) => {
            if let Ok(v) = s.trim().parse() {
                o.credit = Some(v);
            }
        }
        _ => {}
    }
}

fn set_capacity(cell: &Data, o: &mut ClassInfo) {
    o.capacity = cell_int(cell);
}

/// Column J holds a reserved/occupied count; net capacity is I minus J.
fn subtract_reserved(cell: &Data, o: &mut ClassInfo) {
    o.capacity -= cell_int(cell);
}

fn push_teacher(cell: &Data, o: &mut ClassInfo) {
    let Some(raw) = cell_str(cell) else { return };
    let teacher = normalize(raw);
    if !teacher.is_empty() && !o.teachers.contains(&teacher) {
        o.teachers.push(teacher);
    }
}

enum Meeting {
    Session { session: Session, kind: Option<char> },
    Exam(Exam),
}

fn set_meeting(cell: &Data, o: &mut ClassInfo) {
    if is_blank(cell) {
        return;
    }
    let Some(raw) = cell_str(cell) else { return };
    match parse_meeting(raw) {
        Some(Meeting::Session { session, kind }) => {
            if let Some(kind) = kind {
                note_session_kind(o, kind);
            }
            merge_session(&mut o.sessions, session);
        }
        Some(Meeting::Exam(exam)) => o.exams.push(exam),
        None => {}
    }
}

/// Accumulate the single-character session type code (lecture, lab,
/// tutorial...) onto the record as a comma-joined set of distinct codes.
fn note_session_kind(o: &mut ClassInfo, kind: char) {
    let code = kind.to_string();
    match &mut o.course_type {
        None => o.course_type = Some(code),
        Some(types) => {
            if !types.split('،').any(|c| c == code) {
                types.push('،');
                types.push_str(&code);
            }
        }
    }
}

/// Classify and parse a column N cell.
///
/// ```text
/// [kind]
///    |   [day text]             [parity marker, may be absent]
///    |      |                   |
///    v  vvvvvvvvvv              v
/// درس(ت): سه شنبه 10:00-12:00 ف مکان: کلاس 101
///                 ^^^^^^^^^^^    ^^^^^^^^^^^^^ place suffix
///                 time span
/// ```
fn parse_meeting(raw: &str) -> Option<Meeting> {
    if SESSION_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        return parse_session_cell(raw);
    }
    if raw.starts_with(EXAM_PREFIX) {
        return Some(Meeting::Exam(parse_exam_cell(raw)));
    }
    // any other content in this column is not meeting data
    None
}

fn parse_session_cell(raw: &str) -> Option<Meeting> {
    let Some(span) = TIME_SPAN.find(raw) else {
        warn!(text = raw, "golestan session text has no time span, skipping");
        return None;
    };

    let colon = raw.find(':');
    // the session type code sits two characters before the first colon,
    // inside the parenthesized prefix
    let kind = colon.and_then(|i| raw[..i].chars().rev().nth(1));
    let day_text = match colon {
        Some(i) if i + 1 <= span.start() => raw[i + 1..span.start()].trim(),
        _ => "",
    };
    let day = if day_text.is_empty() { None } else { DayOfWeek::from_name(day_text) };

    let mut halves = span.as_str().splitn(2, '-');
    let starts = halves.next().map(parse_time).unwrap_or_default();
    let ends = halves.next().map(parse_time).unwrap_or_default();

    let mut rest = raw[span.end()..].trim();
    let mut parity = None;
    if let Some(c) = rest.chars().next() {
        if let Some(p) = WeekParity::from_marker(c) {
            parity = Some(p);
            rest = rest[c.len_utf8()..].trim_start();
        }
    }
    let place = rest
        .strip_prefix(PLACE_LABEL)
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty());

    Some(Meeting::Session {
        session: Session { starts, ends, day, parity, place },
        kind,
    })
}

/// Exam cells carry a `YYYY.MM.DD` date and an `HH:MM-HH:MM` span after
/// the first colon; the second half of the span is an optional end time.
fn parse_exam_cell(raw: &str) -> Exam {
    let mut date = Epoch::default();
    if let Some(m) = EXAM_DATE.find(raw) {
        let mut parts = m.as_str().split('.');
        date.year = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        date.month = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        date.day = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    }

    let after_colon = match raw.find(':') {
        Some(i) => raw[i + 1..].trim(),
        None => "",
    };
    let mut halves = after_colon.splitn(2, '-');
    let starts = halves.next().map(parse_time).unwrap_or_default();
    let ends = halves.next().map(|h| parse_time(h.trim()));

    Exam { date, starts, ends }
}

/// Fold a freshly parsed session into the record's existing sessions.
///
/// 1. An existing same-day session ending exactly when the new one starts
///    is extended to the new end time (back-to-back rows describing one
///    contiguous block).
/// 2. Otherwise an existing session matching day, start and end exactly but
///    differing in parity has its parity cleared to "every week".
/// 3. Otherwise the new session is appended.
///
/// Only the first matching stored session participates; iteration stops at
/// the first match.
pub(crate) fn merge_session(sessions: &mut Vec<Session>, incoming: Session) {
    for existing in sessions.iter_mut() {
        // e.g. WED 12-13 + WED 13-14 => WED 12-14
        if existing.day == incoming.day && existing.ends == incoming.starts {
            existing.ends = incoming.ends;
            return;
        }

        if existing.day == incoming.day
            && existing.starts == incoming.starts
            && existing.ends == incoming.ends
        {
            if existing.parity != incoming.parity {
                existing.parity = None;
            }
            return;
        }
    }
    sessions.push(incoming);
}

// =============================================================================
// Auxiliary Credit Worksheet
// =============================================================================

/// Extract `(course id, credit)` pairs from the auxiliary "field lesson"
/// worksheet: column C is the standard course id, columns E and F sum to
/// the credit.
pub fn credit_rows<'a, I>(rows: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut pairs = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() < 6 {
            warn!(row = i + 2, len = row.len(), "credit sheet row too short, skipping");
            continue;
        }
        let course_id = cell_text(&row[2]);
        if course_id.is_empty() {
            continue;
        }
        let credit = cell_num(&row[4]) + cell_num(&row[5]);
        pairs.push((course_id, credit));
    }
    pairs
}
