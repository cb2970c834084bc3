//! Filter stage - case-insensitive full-text search over top-level rows

use super::row::Row;

/// Indices of the top-level rows matching `term`, in their original order.
///
/// A row matches when the term occurs (case-insensitively) in its id or in the
/// text of any of its own field values. Descendants are never consulted, so a
/// parent that fails the test is excluded even if a child would match.
/// An empty term keeps every row.
pub fn filter_rows(rows: &[Row], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = term.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Check a single row against an already-lowercased needle
pub fn row_matches(row: &Row, needle: &str) -> bool {
    if row.id.to_lowercase().contains(needle) {
        return true;
    }

    row.fields
        .values()
        .filter_map(|value| value.raw_text())
        .any(|text| text.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::CellValue;

    fn customers() -> Vec<Row> {
        vec![
            Row::leaf(
                "1",
                [
                    ("name", CellValue::text("MegaMart Chain")),
                    ("type", CellValue::text("Retail Chain")),
                    ("locations", CellValue::Number(45.0)),
                ],
            ),
            Row::leaf(
                "2",
                [
                    ("name", CellValue::text("QuickShop Express")),
                    ("type", CellValue::text("Convenience Store")),
                    ("contact", CellValue::Null),
                ],
            ),
            Row::leaf(
                "3",
                [
                    ("name", CellValue::text("FreshFood Markets")),
                    ("type", CellValue::text("Supermarket")),
                ],
            )
            .with_children(vec![Row::leaf("3-1", [("name", "Megamart Outlet")])]),
        ]
    }

    #[test]
    fn test_empty_term_is_identity() {
        let rows = customers();
        assert_eq!(filter_rows(&rows, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let rows = customers();
        assert_eq!(filter_rows(&rows, "megamart"), vec![0]);
        assert_eq!(filter_rows(&rows, "MEGAMART"), vec![0]);
        assert_eq!(filter_rows(&rows, "chain"), vec![0]);
    }

    #[test]
    fn test_children_are_not_searched() {
        let rows = customers();
        // "Outlet" only appears on a child of row 3
        assert!(filter_rows(&rows, "outlet").is_empty());
    }

    #[test]
    fn test_numbers_and_nulls() {
        let rows = customers();
        assert_eq!(filter_rows(&rows, "45"), vec![0]);
        // Null never matches but does not exclude the row
        assert_eq!(filter_rows(&rows, "quick"), vec![1]);
    }

    #[test]
    fn test_no_match() {
        let rows = customers();
        assert!(filter_rows(&rows, "zzz").is_empty());
    }

    #[test]
    fn test_filter_idempotent() {
        let rows = customers();
        for term in ["", "m", "mart", "store", "zzz"] {
            let once = filter_rows(&rows, term);
            let kept: Vec<Row> = once.iter().map(|&i| rows[i].clone()).collect();
            let twice = filter_rows(&kept, term);
            assert_eq!(twice, (0..kept.len()).collect::<Vec<_>>(), "term {:?}", term);
        }
    }

    #[test]
    fn test_filter_monotonic() {
        let rows = customers();
        let prefixes = ["", "m", "ma", "mar", "mark", "marke", "market"];
        for pair in prefixes.windows(2) {
            let wide = filter_rows(&rows, pair[0]);
            let narrow = filter_rows(&rows, pair[1]);
            assert!(
                narrow.iter().all(|i| wide.contains(i)),
                "{:?} is not a subset of {:?}",
                pair[1],
                pair[0]
            );
        }
    }
}
