use dataset::{Dataset, STAT_COUNT};
use serde::{Deserialize, Serialize};

/// A whole-body rollup of a dataset's shape, grounded in the original
/// `changes.go`'s `ChangeSummaryStats` (supplementing spec.md §4.6's
/// column-level detail with the coarser numbers a caller wants at a
/// glance before drilling into individual columns).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StatsSummary {
    pub entries: i64,
    pub columns: i64,
    /// Total `null`/missing cells observed across all columns. Derived as
    /// `entries - count` per column, which is exact for non-nullable
    /// columns (where `count` already excludes nulls, spec.md §4.3) but
    /// under-reports for nullable columns, whose `count` includes nulls
    /// and so carries no information about how many of them were null.
    /// Tracking a true per-column null count would require widening the
    /// Stats Accumulator's external snapshot contract (spec.md §3), which
    /// this core does not do.
    pub null_values: i64,
    pub total_size: i64,
}

impl StatsSummary {
    pub fn of(dataset: &Dataset) -> StatsSummary {
        let structure = dataset.structure.as_ref();
        let entries = structure.map(|s| s.entries as i64).unwrap_or(0);
        let total_size = structure.map(|s| s.length as i64).unwrap_or(0);
        let per_column = dataset
            .stats
            .as_ref()
            .map(|s| s.per_column.as_slice())
            .unwrap_or(&[]);
        let columns = per_column.len() as i64;
        let null_values: i64 = per_column
            .iter()
            .map(|stats| {
                let count = stats.get(STAT_COUNT).copied().unwrap_or(0.0) as i64;
                (entries - count).max(0)
            })
            .sum();
        StatsSummary {
            entries,
            columns,
            null_values,
            total_size,
        }
    }

    pub fn delta(left: &StatsSummary, right: &StatsSummary) -> StatsSummary {
        StatsSummary {
            entries: right.entries - left.entries,
            columns: right.columns - left.columns,
            null_values: right.null_values - left.null_values,
            total_size: right.total_size - left.total_size,
        }
    }
}
