//! Conflict detection over a picked set of class records.
//!
//! The detector is pure: it takes the currently picked [`ClassInfo`]
//! records and computes, per weekday, which sessions collide in time and
//! which records share an exam date. Time collisions are hour-granular
//! and exclusive, so back-to-back sessions (10:00 end against 10:00
//! start) do not count. Odd-week and even-week sessions never collide
//! with each other; an unmarked session collides with both.

use serde::Serialize;
use tracing::debug;

use crate::models::{ranges_overlap, ClassInfo, DayOfWeek, Session};

/// One session of a picked record, placed on a day and flagged against
/// the rest of the picked set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedSession {
    pub class_id: i64,
    pub course_title: String,
    pub session: Session,
    /// Another picked session on this day overlaps this one in time.
    pub time_overlap: bool,
    /// Another picked record holds an exam on the same date as one of
    /// this record's exams.
    pub exam_overlap: bool,
}

/// Total picked credits against a cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditSummary {
    pub total: f64,
    pub max: f64,
    pub over_enrolled: bool,
}

/// Whether two sessions can fall in the same week.
///
/// Equal markers coincide, and an unmarked session runs every week; only
/// an odd/even pair is guaranteed disjoint.
fn parity_compatible(a: &Session, b: &Session) -> bool {
    match (a.parity, b.parity) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// Hour-granularity exclusive overlap. Minutes are ignored, so 09:30-10:30
/// against 10:00-11:00 compares as hours 9-10 against 10-11 and does not
/// collide.
fn hours_collide(a: &Session, b: &Session) -> bool {
    ranges_overlap(a.starts.hour, a.ends.hour, b.starts.hour, b.ends.hour, false)
}

fn on_day(session: &Session, day: DayOfWeek) -> bool {
    session.day == Some(day)
}

/// Plan one weekday: every session of every picked record that falls on
/// that day yields one entry, flagged against every other session instance
/// on the same day (a session never collides with itself, but two sessions
/// of the same record can), sorted by start time.
pub fn day_schedule(picked: &[ClassInfo], day: DayOfWeek) -> Vec<PlannedSession> {
    let todays: Vec<(&ClassInfo, &Session)> = picked
        .iter()
        .flat_map(|record| {
            record
                .sessions
                .iter()
                .filter(|s| on_day(s, day))
                .map(move |s| (record, s))
        })
        .collect();

    let mut planned: Vec<PlannedSession> = Vec::with_capacity(todays.len());

    for (record, session) in &todays {
        let time_overlap = todays.iter().any(|(_, other)| {
            !std::ptr::eq(*session, *other)
                && parity_compatible(session, other)
                && hours_collide(session, other)
        });

        let exam_overlap = record.exams.iter().any(|exam| {
            picked
                .iter()
                .filter(|other| !std::ptr::eq(*record, *other))
                .flat_map(|other| other.exams.iter())
                .any(|other| exam.same_date(other))
        });

        planned.push(PlannedSession {
            class_id: record.id,
            course_title: record.course_title.clone(),
            session: (*session).clone(),
            time_overlap,
            exam_overlap,
        });
    }

    planned.sort_by_key(|p| p.session.starts.total_minutes());
    debug!(day = day.name(), sessions = planned.len(), "planned day");
    planned
}

/// Plan the whole week, Saturday first.
pub fn weekly_schedule(picked: &[ClassInfo]) -> [Vec<PlannedSession>; 7] {
    std::array::from_fn(|i| day_schedule(picked, DayOfWeek::ALL[i]))
}

/// Sum picked credits against a cap. A record without a known credit
/// counts as 0.
pub fn credit_summary(picked: &[ClassInfo], max_credit: f64) -> CreditSummary {
    let total: f64 = picked.iter().map(|c| c.credit.unwrap_or(0.0)).sum();
    CreditSummary { total, max: max_credit, over_enrolled: total > max_credit }
}
