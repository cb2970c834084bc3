//! Sort stage - stable single-column ordering of top-level rows

use super::row::Row;
use super::value::CellValue;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// At most one active sort column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SortState {
    pub column_key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column_key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_key: Some(column_key.into()),
            direction,
        }
    }

    /// Header-click semantics: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn toggle(&mut self, column_key: &str) {
        if self.column_key.as_deref() == Some(column_key) {
            self.direction = self.direction.toggled();
        } else {
            self.column_key = Some(column_key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// Direction of `column_key` if it is the active sort column
    pub fn direction_for(&self, column_key: &str) -> Option<SortDirection> {
        (self.column_key.as_deref() == Some(column_key)).then_some(self.direction)
    }
}

/// Reorder `indices` (positions into `rows`) by the sort state.
///
/// The sort is stable. `Desc` reverses the comparison itself, so rows with
/// equal keys keep their relative order in both directions. When the sorted
/// rows hold more than one class of non-null value under the key, every pair
/// compares by raw text. Children are never touched.
pub fn sort_rows(rows: &[Row], indices: &mut [usize], sort: &SortState) {
    let Some(key) = sort.column_key.as_deref() else {
        return;
    };

    let compare: fn(&CellValue, &CellValue) -> Ordering = if has_mixed_classes(rows, indices, key)
    {
        CellValue::text_cmp
    } else {
        CellValue::natural_cmp
    };

    indices.sort_by(|&a, &b| {
        let ordering = compare(rows[a].get(key), rows[b].get(key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn has_mixed_classes(rows: &[Row], indices: &[usize], key: &str) -> bool {
    let mut classes = indices
        .iter()
        .map(|&i| rows[i].get(key))
        .filter(|value| !value.is_null())
        .map(CellValue::kind_rank);

    match classes.next() {
        Some(first) => classes.any(|class| class != first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, revenue: f64, region: &str) -> Row {
        Row::leaf(
            id,
            [
                ("revenue", CellValue::Currency(revenue)),
                ("region", CellValue::text(region)),
            ],
        )
    }

    fn ids(rows: &[Row], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| rows[i].id.clone()).collect()
    }

    #[test]
    fn test_no_sort_column_is_identity() {
        let rows = vec![row("a", 3.0, "N"), row("b", 1.0, "S")];
        let mut indices = vec![0, 1];
        sort_rows(&rows, &mut indices, &SortState::default());
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_numeric_sort() {
        let rows = vec![row("a", 300.0, "N"), row("b", 20.0, "S"), row("c", 1000.0, "E")];
        let mut indices = vec![0, 1, 2];

        sort_rows(&rows, &mut indices, &SortState::by("revenue", SortDirection::Asc));
        assert_eq!(ids(&rows, &indices), vec!["b", "a", "c"]);

        sort_rows(&rows, &mut indices, &SortState::by("revenue", SortDirection::Desc));
        assert_eq!(ids(&rows, &indices), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_stable_on_ties_both_directions() {
        let rows = vec![
            row("a", 1.0, "North"),
            row("b", 2.0, "South"),
            row("c", 3.0, "North"),
            row("d", 4.0, "South"),
            row("e", 5.0, "North"),
        ];

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut asc, &SortState::by("region", SortDirection::Asc));
        assert_eq!(ids(&rows, &asc), vec!["a", "c", "e", "b", "d"]);

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut desc, &SortState::by("region", SortDirection::Desc));
        assert_eq!(ids(&rows, &desc), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_sort_round_trip_without_ties() {
        let rows = vec![
            row("a", 42.0, "x"),
            row("b", -3.5, "x"),
            row("c", 17.0, "x"),
            row("d", 0.0, "x"),
        ];

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut asc, &SortState::by("revenue", SortDirection::Asc));
        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut desc, &SortState::by("revenue", SortDirection::Desc));

        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_mixed_column_sorts_as_text() {
        let rows = vec![
            Row::leaf("a", [("locations", CellValue::text("many"))]),
            Row::leaf("b", [("locations", CellValue::Number(12.0))]),
            Row::leaf("c", [("other", CellValue::Number(1.0))]),
            Row::leaf("d", [("locations", CellValue::Number(9.0))]),
        ];
        let mut indices = vec![0, 1, 2, 3];
        sort_rows(&rows, &mut indices, &SortState::by("locations", SortDirection::Asc));

        // missing field is Null and sorts first; "12" < "9" < "many" as text
        assert_eq!(ids(&rows, &indices), vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_mixed_classes_only_within_sorted_rows() {
        let rows = vec![
            Row::leaf("a", [("n", CellValue::Number(12.0))]),
            Row::leaf("b", [("n", CellValue::text("many"))]),
            Row::leaf("c", [("n", CellValue::Number(9.0))]),
        ];
        // the text row is filtered out, so the remaining numbers sort numerically
        let mut indices = vec![0, 2];
        sort_rows(&rows, &mut indices, &SortState::by("n", SortDirection::Asc));
        assert_eq!(ids(&rows, &indices), vec!["c", "a"]);
    }

    #[test]
    fn test_large_mixed_column_sorts_both_directions() {
        // deterministic LCG so the mix of tags is irregular
        let mut seed: u64 = 0x2545_f491;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            seed >> 33
        };

        let rows: Vec<Row> = (0..320)
            .map(|i| {
                let n = next() % 1000;
                let value = match next() % 3 {
                    0 => CellValue::text(n.to_string()),
                    1 => CellValue::Number(n as f64),
                    _ => CellValue::Currency(n as f64 / 4.0),
                };
                Row::leaf(format!("r{}", i), [("k", value)])
            })
            .collect();

        let keys = |indices: &[usize]| -> Vec<Option<String>> {
            indices.iter().map(|&i| rows[i].get("k").raw_text()).collect()
        };

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut asc, &SortState::by("k", SortDirection::Asc));
        let asc_keys = keys(&asc);
        assert!(asc_keys.windows(2).all(|w| w[0] <= w[1]));

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut desc, &SortState::by("k", SortDirection::Desc));
        let desc_keys = keys(&desc);
        assert!(desc_keys.windows(2).all(|w| w[0] >= w[1]));

        let mut sorted = asc.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..rows.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_toggle_semantics() {
        let mut sort = SortState::default();
        sort.toggle("name");
        assert_eq!(sort, SortState::by("name", SortDirection::Asc));
        sort.toggle("name");
        assert_eq!(sort.direction_for("name"), Some(SortDirection::Desc));
        sort.toggle("revenue");
        assert_eq!(sort, SortState::by("revenue", SortDirection::Asc));
        assert_eq!(sort.direction_for("name"), None);
    }
}
