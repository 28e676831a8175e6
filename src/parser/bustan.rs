//! Bustan dialect: the first of the two course-catalog export layouts.
//!
//! Eleven meaningful columns, one session and one exam cell per row. A
//! class section spanning several time blocks shows up as repeated rows
//! with the same class-id, so the session/exam assigners append rather
//! than overwrite and the row key merges those rows into one record.

use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{cell_int, cell_str, cell_text, is_blank, parse_time, Assigner, RowMapper, EMPTY_CELL};
use crate::models::{ClassInfo, DayOfWeek, Epoch, Exam, Session};
use crate::text::normalize;

/// Physical column count of a Bustan class-info worksheet. The last column
/// past the assigner table is discarded.
pub const SHEET_WIDTH: usize = 12;

static TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{2}:[0-9]{2}").unwrap());

/// Column table: title, course id, (ignored), course type, class id,
/// capacity, campus id, campus, teacher, session text, exam text.
static ASSIGNERS: [Option<Assigner>; 11] = [
    Some(set_course_title),
    Some(set_course_id),
    None,
    Some(set_course_type),
    Some(set_id),
    Some(set_capacity),
    Some(set_campus_id),
    Some(set_campus),
    Some(push_teacher),
    Some(push_session),
    Some(push_exam),
];

pub static MAPPER: RowMapper = RowMapper { assigners: &ASSIGNERS, row_key };

/// Rows merge on the raw class-id cell (column E), string-cast.
fn row_key(row: &[Data]) -> Option<String> {
    let key = cell_text(&row[4]);
    (!key.is_empty()).then_some(key)
}

fn sanitized_or_placeholder(cell: &Data) -> String {
    let text = cell_text(cell);
    if text.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        normalize(&text)
    }
}

fn set_course_title(cell: &Data, o: &mut ClassInfo) {
    o.course_title = sanitized_or_placeholder(cell);
}

fn set_course_id(cell: &Data, o: &mut ClassInfo) {
    o.course_id = cell_int(cell);
}

fn set_course_type(cell: &Data, o: &mut ClassInfo) {
    o.course_type = Some(sanitized_or_placeholder(cell));
}

fn set_id(cell: &Data, o: &mut ClassInfo) {
    o.id = cell_int(cell);
}

fn set_capacity(cell: &Data, o: &mut ClassInfo) {
    o.capacity = cell_int(cell);
}

fn set_campus_id(cell: &Data, o: &mut ClassInfo) {
    o.campus_id = cell_int(cell);
}

fn set_campus(cell: &Data, o: &mut ClassInfo) {
    o.campus = sanitized_or_placeholder(cell);
}

fn push_teacher(cell: &Data, o: &mut ClassInfo) {
    let text = cell_text(cell);
    if text.is_empty() {
        return;
    }
    let teacher = normalize(&text);
    if !o.teachers.contains(&teacher) {
        o.teachers.push(teacher);
    }
}

fn push_session(cell: &Data, o: &mut ClassInfo) {
    if is_blank(cell) {
        return;
    }
    let Some(raw) = cell_str(cell) else { return };
    if let Some(session) = parse_session(raw) {
        o.sessions.push(session);
    }
}

fn push_exam(cell: &Data, o: &mut ClassInfo) {
    if is_blank(cell) {
        return;
    }
    let Some(raw) = cell_str(cell) else { return };
    if let Some(exam) = parse_exam(raw) {
        // the exam cell repeats on every row of a section
        if !o.exams.contains(&exam) {
            o.exams.push(exam);
        }
    }
}

/// Session text is `<day name><HH:MM>-<HH:MM>` with optional leading noise:
/// the day name is whatever precedes the first digit run, the times are the
/// first two `HH:MM` matches.
fn parse_session(raw: &str) -> Option<Session> {
    let mut times = TIME.find_iter(raw);
    let (Some(start), Some(end)) = (times.next(), times.next()) else {
        warn!(text = raw, "bustan session text has no time span, skipping");
        return None;
    };

    let day_text = raw[..start.start()].trim();
    let day = if day_text.is_empty() {
        None
    } else {
        DayOfWeek::from_name(day_text)
    };

    Some(Session {
        starts: parse_time(start.as_str()),
        ends: parse_time(end.as_str()),
        day,
        parity: None,
        place: None,
    })
}

/// Exam text is three space-separated tokens: a `Y/M/D` date, a filler
/// word, and an `HH:MM` time.
fn parse_exam(raw: &str) -> Option<Exam> {
    let mut tokens = raw.split_whitespace();
    let date_token = tokens.next();
    let time_token = tokens.nth(1);
    let (Some(date_token), Some(time_token)) = (date_token, time_token) else {
        warn!(text = raw, "bustan exam text is not 'date word time', skipping");
        return None;
    };

    let mut date = date_token
        .split('/')
        .map(|p| p.trim().parse::<u16>().unwrap_or(0));
    let year = date.next().unwrap_or(0);
    let month = date.next().unwrap_or(0) as u8;
    let day = date.next().unwrap_or(0) as u8;

    Some(Exam {
        date: Epoch { year, month, day },
        starts: parse_time(time_token),
        ends: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Time;
    use crate::parser::map_rows;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn row(class_id: &str, session: &str, exam: &str) -> Vec<Data> {
        vec![
            s("فیزیک 1"),
            s("110011"),
            Data::Empty,
            s("پایه"),
            s(class_id),
            Data::Float(40.0),
            Data::Float(12.0),
            s("دانشکده فیزیک"),
            s("دکتر نمونه"),
            s(session),
            s(exam),
            Data::Empty,
        ]
    }

    #[test]
    fn test_parse_session_day_and_times() {
        let session = parse_session("دوشنبه10:00-12:00").unwrap();
        assert_eq!(session.day, Some(DayOfWeek::Monday));
        assert_eq!(session.starts, Time::new(10, 0));
        assert_eq!(session.ends, Time::new(12, 0));
        assert_eq!(session.parity, None);
    }

    #[test]
    fn test_parse_session_without_times_is_skipped() {
        assert!(parse_session("سه شنبه").is_none());
    }

    #[test]
    fn test_parse_exam_tokens() {
        let exam = parse_exam("1404/03/21 ساعت 09:00").unwrap();
        assert_eq!(exam.date, Epoch { year: 1404, month: 3, day: 21 });
        assert_eq!(exam.starts, Time::new(9, 0));
        assert_eq!(exam.ends, None);
    }

    #[test]
    fn test_parse_exam_malformed_is_skipped() {
        assert!(parse_exam("1404/03/21").is_none());
    }

    #[test]
    fn test_placeholder_cells_mean_no_data() {
        let rows = vec![row("1234", "-", "-")];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &MAPPER);
        assert_eq!(records.len(), 1);
        assert!(records[0].sessions.is_empty());
        assert!(records[0].exams.is_empty());
    }

    #[test]
    fn test_rows_with_same_class_id_merge_sessions() {
        let rows = vec![
            row("1234", "شنبه08:00-10:00", "1404/03/21 ساعت 09:00"),
            row("1234", "دوشنبه10:00-12:00", "-"),
        ];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &MAPPER);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 1234);
        assert_eq!(record.course_id, 110011);
        assert_eq!(record.capacity, 40);
        assert_eq!(record.sessions.len(), 2);
        assert_eq!(record.sessions[0].day, Some(DayOfWeek::Saturday));
        assert_eq!(record.sessions[1].day, Some(DayOfWeek::Monday));
        assert_eq!(record.exams.len(), 1);
        // same teacher on both rows is not duplicated
        assert_eq!(record.teachers.len(), 1);
    }

    #[test]
    fn test_repeated_exam_cell_is_not_duplicated() {
        let rows = vec![
            row("1234", "شنبه08:00-10:00", "1404/03/21 ساعت 09:00"),
            row("1234", "دوشنبه10:00-12:00", "1404/03/21 ساعت 09:00"),
        ];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &MAPPER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exams.len(), 1);
    }

    #[test]
    fn test_credit_is_left_unset_for_backfill() {
        let rows = vec![row("1234", "-", "-")];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &MAPPER);
        assert_eq!(records[0].credit, None);
    }
}
