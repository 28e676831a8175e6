//! Row-mapper framework shared by both catalog dialects.
//!
//! A dialect is described by an ordered table of per-column assigner
//! functions (index *i* handles column *i*; `None` ignores the column) plus
//! a row-key function that decides which rows describe the same class
//! section. The engine walks the data rows, groups them by key into one
//! in-progress record per section, applies the assigners and freezes the
//! builders into the output vector.
//!
//! Rows shorter than the assigner table are rejected whole (logged and
//! skipped) rather than partially applied, so a truncated row can never
//! leave a half-populated record behind.

pub mod bustan;
pub mod golestan;

use std::collections::HashMap;

use calamine::Data;
use tracing::warn;

use crate::models::ClassInfo;

/// One per-column extraction function: parse the cell and assign it onto
/// the record under construction.
pub type Assigner = fn(&Data, &mut ClassInfo);

/// Computes the merge key for a raw row, or `None` when the key cell is
/// unusable and the row must be skipped.
pub type RowKeyFn = fn(&[Data]) -> Option<String>;

/// Column table and row identity for one spreadsheet dialect.
pub struct RowMapper {
    pub assigners: &'static [Option<Assigner>],
    pub row_key: RowKeyFn,
}

/// Record under construction for one row group.
///
/// Mutable only while its rows are being applied; [`finish`] freezes it
/// into the immutable output value.
///
/// [`finish`]: ClassInfoBuilder::finish
struct ClassInfoBuilder {
    record: ClassInfo,
}

impl ClassInfoBuilder {
    fn new() -> Self {
        Self { record: ClassInfo::default() }
    }

    fn finish(self) -> ClassInfo {
        self.record
    }
}

/// Apply a dialect's column table to the data rows of a sheet.
///
/// Rows sharing a merge key land on the same record; output order is the
/// first-appearance order of each key.
pub fn map_rows<'a, I>(rows: I, mapper: &RowMapper) -> Vec<ClassInfo>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut builders: Vec<ClassInfoBuilder> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for (i, row) in rows.into_iter().enumerate() {
        if row.len() < mapper.assigners.len() {
            warn!(
                row = i + 2,
                len = row.len(),
                expected = mapper.assigners.len(),
                "row shorter than the column table, skipping"
            );
            continue;
        }

        let Some(key) = (mapper.row_key)(row) else {
            warn!(row = i + 2, "row has no usable merge key, skipping");
            continue;
        };

        let idx = *index_of.entry(key).or_insert_with(|| {
            builders.push(ClassInfoBuilder::new());
            builders.len() - 1
        });

        for (assigner, cell) in mapper.assigners.iter().zip(row) {
            if let Some(assign) = assigner {
                assign(cell, &mut builders[idx].record);
            }
        }
    }

    builders.into_iter().map(ClassInfoBuilder::finish).collect()
}

// =============================================================================
// Cell Coercion Helpers
// =============================================================================

/// Placeholder the sources use for "no data" cells.
pub const EMPTY_CELL: &str = "-";

/// Borrow the cell's text when it is a string cell.
pub fn cell_str(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Stringify any cell variant, trimmed; errors and empties become `""`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // integral floats print without the trailing ".0"
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Numeric coercion with the sources' "or zero" semantics: anything that
/// fails to parse is 0, never an error.
pub fn cell_num(cell: &Data) -> f64 {
    match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Integer coercion, truncating; malformed values default to 0.
pub fn cell_int(cell: &Data) -> i64 {
    cell_num(cell) as i64
}

/// Whether the cell carries no data: empty, or the `-` placeholder.
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => {
            let t = s.trim();
            t.is_empty() || t == EMPTY_CELL
        }
        _ => false,
    }
}

/// Parse an `HH:MM` fragment; missing or malformed parts coerce to 0.
pub(crate) fn parse_time(s: &str) -> crate::models::Time {
    let mut parts = s.splitn(2, ':');
    let hour = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    let minute = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    crate::models::Time::new(hour, minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Time;

    fn string_cell(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_cell_coercions() {
        assert_eq!(cell_int(&Data::Float(42.0)), 42);
        assert_eq!(cell_int(&string_cell(" 17 ")), 17);
        assert_eq!(cell_int(&string_cell("abc")), 0);
        assert_eq!(cell_int(&Data::Empty), 0);
        assert_eq!(cell_num(&string_cell("2.5")), 2.5);
        assert_eq!(cell_text(&Data::Float(1234.0)), "1234");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&Data::Empty));
        assert!(is_blank(&string_cell("-")));
        assert!(is_blank(&string_cell("  ")));
        assert!(!is_blank(&string_cell("x")));
        assert!(!is_blank(&Data::Int(0)));
    }

    #[test]
    fn test_parse_time_defaults() {
        assert_eq!(parse_time("09:30"), Time::new(9, 30));
        assert_eq!(parse_time("9"), Time::new(9, 0));
        assert_eq!(parse_time("xx:yy"), Time::new(0, 0));
    }

    #[test]
    fn test_short_rows_are_skipped_whole() {
        fn set_title(cell: &Data, o: &mut ClassInfo) {
            o.course_title = cell_text(cell);
        }
        static ASSIGNERS: [Option<Assigner>; 2] = [Some(set_title), None];
        fn key(row: &[Data]) -> Option<String> {
            Some(cell_text(&row[0]))
        }
        let mapper = RowMapper { assigners: &ASSIGNERS, row_key: key };

        let rows = vec![
            vec![string_cell("ok"), Data::Empty],
            vec![string_cell("short")],
        ];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &mapper);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_title, "ok");
    }

    #[test]
    fn test_rows_sharing_a_key_merge_into_one_record() {
        fn push_teacher(cell: &Data, o: &mut ClassInfo) {
            o.teachers.push(cell_text(cell));
        }
        static ASSIGNERS: [Option<Assigner>; 2] = [None, Some(push_teacher)];
        fn key(row: &[Data]) -> Option<String> {
            let k = cell_text(&row[0]);
            (!k.is_empty()).then_some(k)
        }
        let mapper = RowMapper { assigners: &ASSIGNERS, row_key: key };

        let rows = vec![
            vec![string_cell("1234"), string_cell("a")],
            vec![string_cell("5678"), string_cell("b")],
            vec![string_cell("1234"), string_cell("c")],
        ];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &mapper);
        assert_eq!(records.len(), 2);
        // insertion order by first appearance of each key
        assert_eq!(records[0].teachers, vec!["a", "c"]);
        assert_eq!(records[1].teachers, vec!["b"]);
    }

    #[test]
    fn test_keyless_rows_are_skipped() {
        static ASSIGNERS: [Option<Assigner>; 1] = [None];
        fn key(row: &[Data]) -> Option<String> {
            let k = cell_text(&row[0]);
            (!k.is_empty()).then_some(k)
        }
        let mapper = RowMapper { assigners: &ASSIGNERS, row_key: key };

        let rows = vec![vec![Data::Empty], vec![string_cell("1")]];
        let records = map_rows(rows.iter().map(|r| r.as_slice()), &mapper);
        assert_eq!(records.len(), 1);
    }
}
