pub mod values;

use crate::config::{COL_ANZAHL, COL_KUMULIERT, COL_NOTE, COL_PROZENT};
use crate::error::NotenspiegelError;
use crate::extraction::table::RawTable;
use crate::model::{CohortId, GradeRow, GradeTable};
use tracing::debug;
use values::{looks_numeric, parse_comma_decimal, parse_count};

/// Derive the cohort identifier from a document location or title.
///
/// Takes the text following `marker` up to the first `suffix`:
/// `.../ECTS_Tab_WS23_24_BA_TEST_DE.pdf` -> `WS23_24_BA_TEST_DE`.
/// If `suffix` never occurs, the rest of the string is used.
pub fn derive_cohort_id(
    location: &str,
    marker: &str,
    suffix: &str,
) -> Result<CohortId, NotenspiegelError> {
    let after = location
        .split(marker)
        .nth(1)
        .filter(|_| !marker.is_empty())
        .ok_or_else(|| {
            NotenspiegelError::Parse(format!("marker '{}' not found in '{}'", marker, location))
        })?;

    let id = match (suffix.is_empty(), after.split_once(suffix)) {
        (false, Some((id, _))) => id,
        _ => after,
    };

    Ok(CohortId::new(id))
}

/// Turn an extracted table into a `GradeTable`.
///
/// Drops `leading_columns` label columns, locates the four grade columns by
/// header name and converts every cell. Rows come back sorted by `Note`.
/// Totals rows (a text label up front and no `Note`) are skipped.
pub fn normalize_table(
    raw: &RawTable,
    leading_columns: usize,
) -> Result<GradeTable, NotenspiegelError> {
    let table = raw.without_leading_columns(leading_columns);

    let note_idx = column_index(&table, COL_NOTE)?;
    let anzahl_idx = column_index(&table, COL_ANZAHL)?;
    let prozent_idx = column_index(&table, COL_PROZENT)?;
    let kumuliert_idx = column_index(&table, COL_KUMULIERT)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (row_idx, (raw_cells, cells)) in raw.rows.iter().zip(&table.rows).enumerate() {
        let row = row_idx + 1;
        let lead = &raw_cells[..leading_columns.min(raw_cells.len())];
        if is_totals_row(lead, cells.get(note_idx)) {
            debug!(row, label = %lead.join(" "), "skipping totals row");
            continue;
        }

        let note = parse_comma_decimal(cell(cells, note_idx, COL_NOTE, row)?)
            .map_err(|e| with_context(e, COL_NOTE, row))?;
        let anzahl = parse_count(cell(cells, anzahl_idx, COL_ANZAHL, row)?)
            .map_err(|e| with_context(e, COL_ANZAHL, row))?;
        let prozent = parse_comma_decimal(cell(cells, prozent_idx, COL_PROZENT, row)?)
            .map_err(|e| with_context(e, COL_PROZENT, row))?;
        let kumuliert = parse_comma_decimal(cell(cells, kumuliert_idx, COL_KUMULIERT, row)?)
            .map_err(|e| with_context(e, COL_KUMULIERT, row))?;

        rows.push(GradeRow {
            note,
            anzahl,
            prozent,
            kumuliert,
        });
    }

    rows.sort_by(|a, b| a.note.cmp(&b.note));

    Ok(GradeTable { rows })
}

fn is_totals_row(lead: &[String], note: Option<&String>) -> bool {
    let labelled = lead.iter().any(|c| !c.trim().is_empty())
        && !lead.iter().any(|c| looks_numeric(c));
    labelled && note.map_or(true, |n| n.trim().is_empty())
}

fn cell<'a>(
    cells: &'a [String],
    idx: usize,
    column: &str,
    row: usize,
) -> Result<&'a str, NotenspiegelError> {
    cells
        .get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| NotenspiegelError::Schema(format!("row {} has no '{}' cell", row, column)))
}

fn with_context(err: NotenspiegelError, column: &str, row: usize) -> NotenspiegelError {
    let detail = match err {
        NotenspiegelError::Schema(msg) => msg,
        other => other.to_string(),
    };
    NotenspiegelError::Schema(format!("column '{}', row {}: {}", column, row, detail))
}

fn column_index(table: &RawTable, name: &str) -> Result<usize, NotenspiegelError> {
    table
        .header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            NotenspiegelError::Schema(format!(
                "missing column '{}' (found: {})",
                name,
                table.header.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(header: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            page_number: 1,
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_derive_cohort_id() {
        let id = derive_cohort_id(
            "tests/assets/::ECTS_Tab_WS23_24_BA_TEST_DE.pdf",
            "ECTS_Tab_",
            ".pdf",
        )
        .unwrap();
        assert_eq!(id.as_str(), "WS23_24_BA_TEST_DE");
    }

    #[test]
    fn test_derive_cohort_id_from_url() {
        let id = derive_cohort_id(
            "https://www.sle.kit.edu/dokumente/ects-tabellen//ECTS_Tab_WS23_24_MA_Informatik_DE.pdf",
            "ECTS_Tab_",
            ".pdf",
        )
        .unwrap();
        assert_eq!(id.as_str(), "WS23_24_MA_Informatik_DE");
    }

    #[test]
    fn test_derive_cohort_id_without_suffix() {
        let id = derive_cohort_id("ECTS_Tab_SS23_BA_Physik", "ECTS_Tab_", ".pdf").unwrap();
        assert_eq!(id.as_str(), "SS23_BA_Physik");
    }

    #[test]
    fn test_derive_cohort_id_missing_marker() {
        let err = derive_cohort_id(
            "https://www.sle.kit.edu/dokumente/Tabelle.pdf",
            "ECTS_Tab_",
            ".pdf",
        )
        .unwrap_err();
        assert!(matches!(err, NotenspiegelError::Parse(_)));
    }

    #[test]
    fn test_normalize_drops_lead_column() {
        let table = raw(
            &["", "Note", "Anzahl", "Prozent", "Kumuliert"],
            &[
                &["1", "1,0", "3", "0,65", "0,65"],
                &["2", "1,1", "4", "0,87", "1,52"],
            ],
        );
        let grades = normalize_table(&table, 1).unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(
            grades.rows[0],
            GradeRow {
                note: dec!(1.0),
                anzahl: 3,
                prozent: dec!(0.65),
                kumuliert: dec!(0.65),
            }
        );
        assert_eq!(grades.rows[1].kumuliert, dec!(1.52));
    }

    #[test]
    fn test_normalize_sorts_by_note() {
        let table = raw(
            &["#", "Note", "Anzahl", "Prozent", "Kumuliert"],
            &[
                &["a", "2,0", "1", "50,0", "100,0"],
                &["b", "1,0", "1", "50,0", "50,0"],
            ],
        );
        let grades = normalize_table(&table, 1).unwrap();
        assert_eq!(grades.rows[0].note, dec!(1.0));
        assert_eq!(grades.rows[1].note, dec!(2.0));
    }

    #[test]
    fn test_missing_cumulative_column_is_schema_error() {
        let table = raw(
            &["", "Note", "Anzahl", "Prozent"],
            &[&["1", "1,0", "3", "0,65"]],
        );
        let err = normalize_table(&table, 1).unwrap_err();
        assert!(matches!(err, NotenspiegelError::Schema(_)));
        assert!(err.to_string().contains("Kumuliert"));
    }

    #[test]
    fn test_note_dropped_with_lead_column() {
        // Without a label column the first real column is lost.
        let table = raw(
            &["Note", "Anzahl", "Prozent", "Kumuliert"],
            &[&["1,0", "3", "0,65", "0,65"]],
        );
        assert!(normalize_table(&table, 1).is_err());
        assert!(normalize_table(&table, 0).is_ok());
    }

    #[test]
    fn test_totals_row_is_skipped() {
        let table = raw(
            &["", "Note", "Anzahl", "Prozent", "Kumuliert"],
            &[
                &["1", "1,0", "3", "60,0", "60,0"],
                &["2", "2,0", "2", "40,0", "100,0"],
                &["Summe", "", "5", "100,0", "100,0"],
            ],
        );
        let grades = normalize_table(&table, 1).unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades.total_count(), 5);
    }

    #[test]
    fn test_numbered_row_without_note_is_schema_error() {
        let table = raw(
            &["", "Note", "Anzahl", "Prozent", "Kumuliert"],
            &[&["1", "", "3", "60,0", "60,0"]],
        );
        let err = normalize_table(&table, 1).unwrap_err();
        assert!(err.to_string().contains("Note"));
    }

    #[test]
    fn test_bad_cell_is_schema_error() {
        let table = raw(
            &["", "Note", "Anzahl", "Prozent", "Kumuliert"],
            &[&["1", "1,0", "3", "x", "0,65"]],
        );
        let err = normalize_table(&table, 1).unwrap_err();
        assert!(matches!(err, NotenspiegelError::Schema(_)));
        assert!(err.to_string().contains("Prozent"));
    }
}
