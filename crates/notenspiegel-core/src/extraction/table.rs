use crate::extraction::PageContent;
use crate::parsing::values::looks_numeric;

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout keeps column alignment using spaces. A table starts at a
/// header line naming at least two expected columns and runs over the data
/// lines that follow it. Column boundaries are taken from the character spans
/// of the data lines, so a column without a header label (the row-label
/// column in front of `Note`) still gets a cell, with an empty header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub page_number: usize,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn without_leading_columns(&self, n: usize) -> RawTable {
        RawTable {
            page_number: self.page_number,
            header: self.header.iter().skip(n).cloned().collect(),
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().skip(n).cloned().collect())
                .collect(),
        }
    }
}

/// A run of text on one line, in character columns (end exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    text: String,
}

/// Detect if a line looks like a table header row.
pub fn is_table_header(line: &str, expected: &[String]) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    expected
        .iter()
        .filter(|col| tokens.contains(&col.as_str()))
        .count()
        >= 2
}

/// Find every table on every page, in document order.
pub fn extract_tables(pages: &[PageContent], expected: &[String]) -> Vec<RawTable> {
    let mut tables = Vec::new();

    for page in pages {
        let mut header: Option<Vec<Span>> = None;
        let mut rows: Vec<Vec<Span>> = Vec::new();

        for line in &page.lines {
            if is_table_header(line, expected) {
                flush(page.page_number, header.take(), &mut rows, &mut tables);
                header = Some(split_spans(line));
                continue;
            }

            if header.is_none() || line.trim().is_empty() {
                continue;
            }

            let spans = split_spans(line);
            if is_data_row(&spans) {
                rows.push(spans);
            } else if !rows.is_empty() {
                // Footer or prose after the data ends the table.
                flush(page.page_number, header.take(), &mut rows, &mut tables);
            }
        }

        flush(page.page_number, header.take(), &mut rows, &mut tables);
    }

    tables
}

fn flush(
    page_number: usize,
    header: Option<Vec<Span>>,
    rows: &mut Vec<Vec<Span>>,
    tables: &mut Vec<RawTable>,
) {
    let rows = std::mem::take(rows);
    if let Some(header) = header {
        if !rows.is_empty() {
            tables.push(build_table(page_number, &header, &rows));
        }
    }
}

fn is_data_row(spans: &[Span]) -> bool {
    spans.len() >= 2
        && spans.iter().filter(|s| looks_numeric(&s.text)).count() >= 2
        && spans.last().is_some_and(|s| looks_numeric(&s.text))
}

fn build_table(page_number: usize, header: &[Span], rows: &[Vec<Span>]) -> RawTable {
    let columns = column_bounds(rows);

    let place = |spans: &[Span]| {
        let mut cells = vec![String::new(); columns.len()];
        for span in spans {
            if let Some(idx) = best_column(&columns, span) {
                let cell = &mut cells[idx];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&span.text);
            }
        }
        cells
    };

    RawTable {
        page_number,
        header: place(header),
        rows: rows.iter().map(|r| place(r)).collect(),
    }
}

/// Merge the character intervals of all data cells into column bounds.
fn column_bounds(rows: &[Vec<Span>]) -> Vec<(usize, usize)> {
    let mut intervals: Vec<(usize, usize)> =
        rows.iter().flatten().map(|s| (s.start, s.end)).collect();
    intervals.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Column with the largest overlap, or the nearest one if nothing overlaps.
fn best_column(columns: &[(usize, usize)], span: &Span) -> Option<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, &col)| (i, overlap(col, span)))
        .filter(|&(_, o)| o > 0)
        .max_by_key(|&(_, o)| o)
        .map(|(i, _)| i)
        .or_else(|| {
            columns
                .iter()
                .enumerate()
                .min_by_key(|&(_, &(start, end))| (start + end).abs_diff(span.start + span.end))
                .map(|(i, _)| i)
        })
}

fn overlap((start, end): (usize, usize), span: &Span) -> usize {
    end.min(span.end).saturating_sub(start.max(span.start))
}

/// Split a line into spans separated by gaps of 2+ whitespace characters.
fn split_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<Span> = None;
    let mut gap = 0;

    for (col, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            gap += 1;
            if gap == 2 {
                if let Some(span) = current.take() {
                    spans.push(span);
                }
            }
            continue;
        }

        match current.as_mut() {
            Some(span) => {
                if gap == 1 {
                    span.text.push(' ');
                }
                span.text.push(c);
                span.end = col + 1;
            }
            None => {
                current = Some(Span {
                    start: col,
                    end: col + 1,
                    text: c.to_string(),
                })
            }
        }
        gap = 0;
    }

    if let Some(span) = current {
        spans.push(span);
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> Vec<String> {
        ["Note", "Anzahl", "Prozent", "Kumuliert"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn fixed(cells: [&str; 5]) -> String {
        format!(
            "{:>6}{:>9}{:>10}{:>11}{:>13}",
            cells[0], cells[1], cells[2], cells[3], cells[4]
        )
    }

    fn page(number: usize, lines: Vec<String>) -> PageContent {
        PageContent {
            page_number: number,
            lines,
        }
    }

    #[test]
    fn test_split_spans() {
        let spans = split_spans("  Note in Worten   1,0    3");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Note in Worten", "1,0", "3"]);
        assert_eq!(spans[0].start, 2);
        assert_eq!(spans[0].end, 16);
    }

    #[test]
    fn test_split_spans_counts_chars_not_bytes() {
        let spans = split_spans("Prüfung  1,0");
        assert_eq!(spans[1].start, 9);
    }

    #[test]
    fn test_is_table_header() {
        assert!(is_table_header("   Note   Anzahl   Prozent   Kumuliert", &expected()));
        assert!(!is_table_header("Notenverteilung des Studiengangs", &expected()));
    }

    #[test]
    fn test_unlabelled_lead_column_gets_empty_header() {
        let pages = vec![page(
            1,
            vec![
                "ECTS-Einstufungstabelle".into(),
                String::new(),
                fixed(["", "Note", "Anzahl", "Prozent", "Kumuliert"]),
                fixed(["1", "1,0", "3", "0,65", "0,65"]),
                fixed(["2", "1,1", "4", "0,87", "1,52"]),
            ],
        )];

        let tables = extract_tables(&pages, &expected());
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.header, vec!["", "Note", "Anzahl", "Prozent", "Kumuliert"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["1", "1,0", "3", "0,65", "0,65"]);
    }

    #[test]
    fn test_footer_ends_table() {
        let pages = vec![page(
            1,
            vec![
                fixed(["", "Note", "Anzahl", "Prozent", "Kumuliert"]),
                fixed(["1", "1,0", "3", "0,65", "0,65"]),
                String::new(),
                "Stand: 01.03.2024   Seite 1".into(),
                fixed(["9", "9,9", "9", "9,99", "9,99"]),
            ],
        )];

        let tables = extract_tables(&pages, &expected());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 1);
    }

    #[test]
    fn test_tables_on_several_pages() {
        let header = fixed(["", "Note", "Anzahl", "Prozent", "Kumuliert"]);
        let pages = vec![
            page(1, vec!["Deckblatt".into()]),
            page(
                2,
                vec![header.clone(), fixed(["1", "1,0", "3", "0,65", "0,65"])],
            ),
            page(3, vec![header, fixed(["1", "2,0", "5", "1,00", "1,00"])]),
        ];

        let tables = extract_tables(&pages, &expected());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].page_number, 2);
        assert_eq!(tables[1].page_number, 3);
    }

    #[test]
    fn test_header_without_rows_is_ignored() {
        let pages = vec![page(
            1,
            vec![fixed(["", "Note", "Anzahl", "Prozent", "Kumuliert"])],
        )];
        assert!(extract_tables(&pages, &expected()).is_empty());
    }

    #[test]
    fn test_without_leading_columns() {
        let t = RawTable {
            page_number: 1,
            header: vec!["".into(), "Note".into()],
            rows: vec![vec!["1".into(), "1,0".into()]],
        };
        let dropped = t.without_leading_columns(1);
        assert_eq!(dropped.header, vec!["Note"]);
        assert_eq!(dropped.rows[0], vec!["1,0"]);
        assert_eq!(dropped.column_count(), 1);
    }
}
