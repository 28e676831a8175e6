//! Domain models shared by both catalog dialects.
//!
//! - [`ClassInfo`] - canonical record for one offered class/section
//! - [`Session`] - one recurring weekly time block
//! - [`Exam`] - final exam date/time
//! - [`Time`], [`Epoch`], [`DayOfWeek`], [`WeekParity`] - value types
//!
//! Display behavior lives in free formatting functions
//! ([`format_time`], [`format_session`], [`format_exam`]) rather than on the
//! value types themselves, so records stay plain and serializable.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// Time and Date Value Types
// =============================================================================

/// Time of day in 24-hour format (e.g. 23:15).
///
/// Absent or malformed source values coerce to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
}

impl Time {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight, used for ordering sessions within a day.
    pub fn total_minutes(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

/// A calendar date in whatever calendar the source sheet uses.
///
/// No validity checking beyond numeric parsing; malformed parts coerce to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

// =============================================================================
// Day of Week
// =============================================================================

/// Day of the week, numbered 0..6 from Saturday (regional week start).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    /// Just in case anyone takes classes on a Friday.
    Friday,
}

impl DayOfWeek {
    /// All days in week order, Saturday first.
    pub const ALL: [Self; 7] = [
        Self::Saturday,
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// 0-based index with Saturday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a Farsi day name, accepting the spelling variants seen in the
    /// wild (ZWNJ vs. space vs. joined, Arabic letter forms).
    ///
    /// Unrecognized input logs a warning and maps to `None`; the unmapped
    /// state is preserved rather than coerced to a default day.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "شنبه" => Some(Self::Saturday),

            "یکشنبه" | "يك شنبه" | "یک شنبه" | "يك\u{200c}شنبه" => Some(Self::Sunday),

            "دو شنبه" | "دوشنبه" => Some(Self::Monday),

            "سه\u{200c}شنبه" | "سه شنبه" => Some(Self::Tuesday),

            "چهار شنبه" | "چهارشنبه" => Some(Self::Wednesday),

            "پنج\u{200c}شنبه" | "پنج شنبه" | "پنجشنبه" => Some(Self::Thursday),

            "جمعه" => Some(Self::Friday),

            other => {
                warn!(day = other, "unknown farsi day-of-week representation");
                None
            }
        }
    }

    /// Canonical Farsi name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Saturday => "شنبه",
            Self::Sunday => "یکشنبه",
            Self::Monday => "دوشنبه",
            Self::Tuesday => "سه شنبه",
            Self::Wednesday => "چهارشنبه",
            Self::Thursday => "پنجشنبه",
            Self::Friday => "جمعه",
        }
    }
}

/// Canonical Farsi name, with a fixed placeholder for the unmapped state.
pub fn day_label(day: Option<DayOfWeek>) -> &'static str {
    match day {
        Some(d) => d.name(),
        None => "-",
    }
}

// =============================================================================
// Week Parity
// =============================================================================

/// Alternating-week marker: a session held only on odd or only on even weeks.
///
/// A session carries `Option<WeekParity>`; `None` means it occurs on *every*
/// occurrence of its weekday, which is a distinct third state and not a
/// stand-in for "odd or even".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekParity {
    Odd,
    Even,
}

impl WeekParity {
    /// Single-character sentinel as it appears after a Golestan time span.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            'ف' => Some(Self::Odd),
            'ز' => Some(Self::Even),
            _ => None,
        }
    }

    /// Bracketed Farsi label used in display strings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Odd => "[فرد]",
            Self::Even => "[زوج]",
        }
    }
}

// =============================================================================
// Sessions, Exams, Class Records
// =============================================================================

/// One recurring weekly time block for a class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub starts: Time,
    pub ends: Time,
    /// `None` when the day could not be determined from the source text.
    pub day: Option<DayOfWeek>,
    /// `None` means the session occurs every week.
    pub parity: Option<WeekParity>,
    pub place: Option<String>,
}

/// Final exam date/time, with an optional end time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub date: Epoch,
    pub starts: Time,
    pub ends: Option<Time>,
}

impl Exam {
    /// Whether two exams fall on the same calendar date, ignoring time.
    pub fn same_date(&self, other: &Exam) -> bool {
        self.date == other.date
    }
}

/// Canonical record for one offered class/section, independent of the
/// source dialect.
///
/// `id` uniquely identifies the section; `course_id` identifies the parent
/// course (multiple sections share a `course_id`). Several source rows may
/// describe one record and are merged by a per-dialect row key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub course_type: Option<String>,
    pub credit: Option<f64>,
    pub capacity: i64,
    pub campus: String,
    pub campus_id: i64,
    pub teachers: Vec<String>,
    pub sessions: Vec<Session>,
    pub exams: Vec<Exam>,
}

// =============================================================================
// Formatting
// =============================================================================

/// Render a time of day.
///
/// Without `force_minute`, a zero minute component is omitted entirely
/// (`9` instead of `9:00`); with it, both components are zero-padded
/// (`09:00`).
pub fn format_time(hour: u8, minute: u8, force_minute: bool) -> String {
    let mut s = if force_minute {
        format!("{hour:02}")
    } else {
        hour.to_string()
    };
    if minute != 0 || force_minute {
        s.push(':');
        s.push_str(&format!("{minute:02}"));
    }
    s
}

/// Render a session as its Farsi display string,
/// e.g. `شنبه 10 تا 12 (مکان) [فرد]`.
///
/// The place is omitted unless `append_place` is set; `full_time` forces
/// zero-padded `HH:MM` times.
pub fn format_session(session: &Session, append_place: bool, full_time: bool) -> String {
    let t0 = format_time(session.starts.hour, session.starts.minute, full_time);
    let t1 = format_time(session.ends.hour, session.ends.minute, full_time);
    let mut s = format!("{} {} تا {} ", day_label(session.day), t0, t1);
    if append_place {
        if let Some(place) = &session.place {
            s.push_str(&format!("({place}) "));
        }
    }
    if let Some(parity) = session.parity {
        s.push_str(parity.label());
    }
    s.trim_end().to_string()
}

/// Render an exam as `Y/MM/DD HH:MM` with an optional `-HH:MM` end time.
pub fn format_exam(exam: &Exam) -> String {
    let mut s = format!(
        "{}/{:02}/{:02} {:02}:{:02}",
        exam.date.year, exam.date.month, exam.date.day, exam.starts.hour, exam.starts.minute
    );
    if let Some(ends) = exam.ends {
        s.push_str(&format!("-{:02}:{:02}", ends.hour, ends.minute));
    }
    s
}

// =============================================================================
// Range Overlap
// =============================================================================

/// Check whether ranges `[a0, a1]` and `[b0, b1]` overlap.
///
/// With `inclusive` set, touching endpoints count as overlap, so adjacent
/// classes (09:00-10:00 next to 10:00-11:00) conflict; the default strict
/// test reports no conflict for touching ranges.
pub fn ranges_overlap<T: PartialOrd>(a0: T, a1: T, b0: T, b1: T, inclusive: bool) -> bool {
    if inclusive {
        a1 >= b0 && a0 <= b1
    } else {
        a1 > b0 && a0 < b1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_names_round_trip() {
        for day in DayOfWeek::ALL {
            assert_eq!(DayOfWeek::from_name(day.name()), Some(day));
            assert_eq!(DayOfWeek::from_index(day.index()), Some(day));
        }
    }

    #[test]
    fn test_day_variants_map_to_canonical() {
        assert_eq!(DayOfWeek::from_name("یک شنبه"), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_name("يك\u{200c}شنبه"), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_name("دو شنبه"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::from_name("سه\u{200c}شنبه"), Some(DayOfWeek::Tuesday));
        assert_eq!(DayOfWeek::from_name("چهار شنبه"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::from_name("پنج شنبه"), Some(DayOfWeek::Thursday));
    }

    #[test]
    fn test_unknown_day_is_preserved_as_unmapped() {
        assert_eq!(DayOfWeek::from_name("mittwoch"), None);
        assert_eq!(day_label(None), "-");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(9, 0, false), "9");
        assert_eq!(format_time(9, 30, false), "9:30");
        assert_eq!(format_time(9, 5, true), "09:05");
        assert_eq!(format_time(13, 0, true), "13:00");
    }

    #[test]
    fn test_ranges_overlap_touching_endpoints() {
        assert!(!ranges_overlap(9, 10, 10, 11, false));
        assert!(ranges_overlap(9, 10, 10, 11, true));
        assert!(ranges_overlap(9, 11, 10, 12, false));
        assert!(!ranges_overlap(9, 10, 11, 12, false));
    }

    #[test]
    fn test_format_session() {
        let session = Session {
            starts: Time::new(10, 0),
            ends: Time::new(12, 0),
            day: Some(DayOfWeek::Saturday),
            parity: Some(WeekParity::Odd),
            place: Some("کلاس 101".into()),
        };
        assert_eq!(format_session(&session, false, false), "شنبه 10 تا 12 [فرد]");
        assert_eq!(
            format_session(&session, true, true),
            "شنبه 10:00 تا 12:00 (کلاس 101) [فرد]"
        );
    }

    #[test]
    fn test_format_exam() {
        let exam = Exam {
            date: Epoch { year: 1404, month: 3, day: 21 },
            starts: Time::new(9, 0),
            ends: None,
        };
        assert_eq!(format_exam(&exam), "1404/03/21 09:00");

        let with_end = Exam { ends: Some(Time::new(11, 30)), ..exam };
        assert_eq!(format_exam(&with_end), "1404/03/21 09:00-11:30");
    }

    #[test]
    fn test_exam_same_date_ignores_time() {
        let a = Exam {
            date: Epoch { year: 1404, month: 3, day: 21 },
            starts: Time::new(9, 0),
            ends: None,
        };
        let b = Exam { starts: Time::new(14, 0), ..a.clone() };
        assert!(a.same_date(&b));
    }
}
