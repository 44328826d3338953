use crate::error::ChangeReportError;
use dataset::{
    Column, ColumnStats, STAT_COUNT, STAT_FALSE_COUNT, STAT_MAX, STAT_MAX_LENGTH, STAT_MEAN,
    STAT_MEDIAN, STAT_MIN, STAT_MIN_LENGTH, STAT_TRUE_COUNT, STAT_UNIQUE,
};

/// The three column kinds the Stats Accumulator distinguishes (spec.md
/// §4.3/§4.6). Mirrors `stats::ColumnAccumulator`'s tagging priority —
/// numeric first, then bool, then string — so a column's delta keys agree
/// with what its accumulator actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Numeric,
    Str,
    Bool,
}

impl Kind {
    fn of(column: &Column) -> Kind {
        if column.is_numeric() {
            Kind::Numeric
        } else if column.is_bool() {
            Kind::Bool
        } else {
            Kind::Str
        }
    }

    fn all_keys(self) -> &'static [&'static str] {
        match self {
            Kind::Numeric => &[STAT_COUNT, STAT_MAX, STAT_MIN, STAT_MEDIAN, STAT_MEAN],
            Kind::Str => &[STAT_COUNT, STAT_MAX_LENGTH, STAT_MIN_LENGTH, STAT_UNIQUE],
            Kind::Bool => &[STAT_COUNT, STAT_TRUE_COUNT, STAT_FALSE_COUNT],
        }
    }

    /// Keys whose absence fails the whole delta with `MissingStats`
    /// (spec.md §4.6: "If median or mean is absent on either side ->
    /// fail"; "unique absence fails"). `count`/`min`/`max`/length keys are
    /// not singled out by the spec, but are held to the same bar here —
    /// a column with values but no min/max would indicate an accumulator
    /// bug, not a legitimate empty-column state.
    fn required_keys(self) -> &'static [&'static str] {
        match self {
            Kind::Numeric => &[STAT_MEDIAN, STAT_MEAN],
            Kind::Str => &[STAT_UNIQUE],
            Kind::Bool => &[],
        }
    }
}

/// Computes the delta map for one aligned column (spec.md §4.6 "Per-column
/// delta"). `left_column`/`right_column` are the column's declared schema
/// on each side (at least one must be `Some`); `left_stats`/`right_stats`
/// are that side's finalized `ColumnStats`, if the column is present on
/// that side.
pub fn column_delta(
    title: &str,
    left_column: Option<&Column>,
    right_column: Option<&Column>,
    left_stats: Option<&ColumnStats>,
    right_stats: Option<&ColumnStats>,
) -> Result<ColumnStats, ChangeReportError> {
    let kind = match (left_column, right_column) {
        (Some(l), Some(r)) => {
            let (lk, rk) = (Kind::of(l), Kind::of(r));
            if lk != rk {
                return Err(ChangeReportError::IncompatibleColumnTypes(title.to_string()));
            }
            lk
        }
        (Some(l), None) => Kind::of(l),
        (None, Some(r)) => Kind::of(r),
        (None, None) => unreachable!("column alignment always registers at least one side"),
    };

    let mut delta = ColumnStats::new();
    match (left_stats, right_stats) {
        (Some(l), Some(r)) => {
            for key in kind.required_keys() {
                if !l.contains_key(*key) || !r.contains_key(*key) {
                    return Err(ChangeReportError::MissingStats(title.to_string()));
                }
            }
            for key in kind.all_keys() {
                match (l.get(*key), r.get(*key)) {
                    (Some(lv), Some(rv)) => {
                        delta.insert((*key).to_string(), rv - lv);
                    }
                    (None, None) => {}
                    _ => return Err(ChangeReportError::MissingStats(title.to_string())),
                }
            }
        }
        (Some(l), None) => {
            for key in kind.required_keys() {
                if !l.contains_key(*key) {
                    return Err(ChangeReportError::MissingStats(title.to_string()));
                }
            }
            for key in kind.all_keys() {
                if let Some(v) = l.get(*key) {
                    delta.insert((*key).to_string(), -v);
                }
            }
        }
        (None, Some(r)) => {
            for key in kind.required_keys() {
                if !r.contains_key(*key) {
                    return Err(ChangeReportError::MissingStats(title.to_string()));
                }
            }
            for key in kind.all_keys() {
                if let Some(v) = r.get(*key) {
                    delta.insert((*key).to_string(), *v);
                }
            }
        }
        // Column alignment guarantees at least one of `left_column`/
        // `right_column` is `Some` (checked above), but says nothing about
        // stats availability — a column can be declared on both sides yet
        // have no computed `ColumnStats` on either (spec.md §4.6: "column
        // exists but no stats present -> fail with IncompatibleColumnTypes").
        (None, None) => return Err(ChangeReportError::IncompatibleColumnTypes(title.to_string())),
    }
    Ok(delta)
}
