use crate::column::ColumnAccumulator;
use crate::error::StatsError;
use dataset::{Column, ColumnStats};
use serde_json::Value;

/// Online, single-pass statistics accumulator parameterized by a schema's
/// column list (spec.md §4.3). One `ColumnAccumulator` per column, held in
/// schema order, so `snapshot()` returns stats in the same order the
/// Change Report Service aligns columns by.
pub struct Accumulator {
    titles: Vec<String>,
    columns: Vec<ColumnAccumulator>,
    closed: bool,
}

impl Accumulator {
    pub fn new(columns: &[Column]) -> Self {
        Accumulator {
            titles: columns.iter().map(|c| c.title.clone()).collect(),
            columns: columns.iter().map(ColumnAccumulator::new).collect(),
            closed: false,
        }
    }

    /// Update accumulator state from one decoded row. Rows missing a
    /// column entirely are treated the same as an explicit `null`.
    pub fn write(&mut self, row: &Value) {
        for (title, acc) in self.titles.iter().zip(self.columns.iter_mut()) {
            let value = row.get(title).unwrap_or(&Value::Null);
            acc.write(value);
        }
    }

    /// Finalize percentiles and any deferred aggregates. MUST be called
    /// exactly once before `snapshot()`.
    pub fn close(&mut self) {
        for acc in &mut self.columns {
            acc.close();
        }
        self.closed = true;
    }

    /// Returns one stat map per column, in schema order.
    pub fn snapshot(&self) -> Result<Vec<ColumnStats>, StatsError> {
        if !self.closed {
            return Err(StatsError::NotClosed);
        }
        Ok(self.columns.iter().map(ColumnAccumulator::snapshot).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dataset::{STAT_COUNT, STAT_MAX, STAT_MEAN, STAT_MEDIAN, STAT_MIN};
    use schema::types;
    use serde_json::json;

    #[test]
    fn numeric_column_accumulates_summary_stats() {
        let columns = vec![Column::new("n", types::INT_OR_FRAC)];
        let mut acc = Accumulator::new(&columns);
        for v in [1, 2, 3, 4] {
            acc.write(&json!({"n": v}));
        }
        acc.close();
        let snap = acc.snapshot().unwrap();
        assert_eq!(snap[0][STAT_COUNT], 4.0);
        assert_eq!(snap[0][STAT_MIN], 1.0);
        assert_eq!(snap[0][STAT_MAX], 4.0);
        assert_eq!(snap[0][STAT_MEAN], 2.5);
        assert_eq!(snap[0][STAT_MEDIAN], 2.5);
    }

    #[test]
    fn nullable_column_counts_nulls_but_excludes_them_from_numeric_stats() {
        let columns = vec![Column::new("n", types::INT_OR_FRAC | types::NULL)];
        let mut acc = Accumulator::new(&columns);
        acc.write(&json!({"n": 10}));
        acc.write(&json!({"n": null}));
        acc.close();
        let snap = acc.snapshot().unwrap();
        assert_eq!(snap[0][STAT_COUNT], 2.0);
        assert_eq!(snap[0][STAT_MIN], 10.0);
    }

    #[test]
    fn non_nullable_column_excludes_nulls_from_count_too() {
        let columns = vec![Column::new("n", types::INT_OR_FRAC)];
        let mut acc = Accumulator::new(&columns);
        acc.write(&json!({"n": 10}));
        acc.write(&json!({"n": null}));
        acc.close();
        let snap = acc.snapshot().unwrap();
        assert_eq!(snap[0][STAT_COUNT], 1.0);
    }

    #[test]
    fn snapshot_before_close_errors() {
        let columns = vec![Column::new("n", types::INT_OR_FRAC)];
        let acc = Accumulator::new(&columns);
        assert!(matches!(acc.snapshot(), Err(StatsError::NotClosed)));
    }

    #[test]
    fn missing_field_is_treated_as_null() {
        let columns = vec![Column::new("n", types::INT_OR_FRAC | types::NULL)];
        let mut acc = Accumulator::new(&columns);
        acc.write(&json!({}));
        acc.close();
        let snap = acc.snapshot().unwrap();
        assert_eq!(snap[0][STAT_COUNT], 1.0);
    }
}
