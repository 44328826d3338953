use dataset::{
    Column, ColumnStats, STAT_COUNT, STAT_FALSE_COUNT, STAT_MAX, STAT_MAX_LENGTH, STAT_MEAN,
    STAT_MEDIAN, STAT_MIN, STAT_MIN_LENGTH, STAT_TRUE_COUNT, STAT_UNIQUE,
};
use schema::Number;
use serde_json::Value;
use std::collections::BTreeSet;

/// Online accumulator for a single column, tagged by the kind of values it
/// has seen (spec.md §4.3, §9 design note: "tagged variant, not a trait
/// object — the three kinds share no incremental update logic").
pub(crate) enum ColumnAccumulator {
    Numeric(NumericAccumulator),
    Str(StringAccumulator),
    Bool(BoolAccumulator),
}

impl ColumnAccumulator {
    pub(crate) fn new(column: &Column) -> Self {
        if column.is_numeric() {
            ColumnAccumulator::Numeric(NumericAccumulator::new(column.nullable))
        } else if column.is_bool() {
            ColumnAccumulator::Bool(BoolAccumulator::new(column.nullable))
        } else {
            ColumnAccumulator::Str(StringAccumulator::new(column.nullable))
        }
    }

    /// Update state from one row's value for this column. Values of a
    /// type the column doesn't expect are ignored rather than erroring —
    /// validation (C2) is responsible for rejecting type mismatches; the
    /// accumulator's job is only to aggregate.
    pub(crate) fn write(&mut self, value: &Value) {
        match self {
            ColumnAccumulator::Numeric(acc) => acc.write(value),
            ColumnAccumulator::Str(acc) => acc.write(value),
            ColumnAccumulator::Bool(acc) => acc.write(value),
        }
    }

    pub(crate) fn close(&mut self) {
        match self {
            ColumnAccumulator::Numeric(acc) => acc.close(),
            ColumnAccumulator::Str(_) | ColumnAccumulator::Bool(_) => {}
        }
    }

    pub(crate) fn snapshot(&self) -> ColumnStats {
        match self {
            ColumnAccumulator::Numeric(acc) => acc.snapshot(),
            ColumnAccumulator::Str(acc) => acc.snapshot(),
            ColumnAccumulator::Bool(acc) => acc.snapshot(),
        }
    }
}

pub(crate) struct NumericAccumulator {
    nullable: bool,
    count: u64,
    min: Option<Number>,
    max: Option<Number>,
    sum: f64,
    values: Vec<f64>,
    median: Option<f64>,
}

impl NumericAccumulator {
    fn new(nullable: bool) -> Self {
        NumericAccumulator {
            nullable,
            count: 0,
            min: None,
            max: None,
            sum: 0.0,
            values: Vec::new(),
            median: None,
        }
    }

    fn write(&mut self, value: &Value) {
        if value.is_null() {
            if self.nullable {
                self.count += 1;
            }
            return;
        }
        let Some(n) = value.as_number().map(Number::from) else {
            return;
        };
        self.count += 1;
        let f = f64::from(n);
        self.sum += f;
        self.values.push(f);
        self.min = Some(match self.min.take() {
            Some(m) if m <= n => m,
            _ => n,
        });
        self.max = Some(match self.max.take() {
            Some(m) if m >= n => m,
            _ => n,
        });
    }

    fn close(&mut self) {
        self.values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        self.median = median_of(&self.values);
    }

    fn snapshot(&self) -> ColumnStats {
        let mut stats = ColumnStats::new();
        stats.insert(STAT_COUNT.to_string(), self.count as f64);
        if let Some(min) = &self.min {
            stats.insert(STAT_MIN.to_string(), f64::from(*min));
        }
        if let Some(max) = &self.max {
            stats.insert(STAT_MAX.to_string(), f64::from(*max));
        }
        if !self.values.is_empty() {
            stats.insert(STAT_MEAN.to_string(), self.sum / self.values.len() as f64);
        }
        if let Some(median) = self.median {
            stats.insert(STAT_MEDIAN.to_string(), median);
        }
        stats
    }
}

fn median_of(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub(crate) struct StringAccumulator {
    nullable: bool,
    count: u64,
    min_length: Option<u64>,
    max_length: Option<u64>,
    distinct: BTreeSet<String>,
}

impl StringAccumulator {
    fn new(nullable: bool) -> Self {
        StringAccumulator {
            nullable,
            count: 0,
            min_length: None,
            max_length: None,
            distinct: BTreeSet::new(),
        }
    }

    fn write(&mut self, value: &Value) {
        if value.is_null() {
            if self.nullable {
                self.count += 1;
            }
            return;
        }
        let Some(s) = value.as_str() else {
            return;
        };
        self.count += 1;
        let len = s.chars().count() as u64;
        self.min_length = Some(self.min_length.map_or(len, |m| m.min(len)));
        self.max_length = Some(self.max_length.map_or(len, |m| m.max(len)));
        self.distinct.insert(s.to_string());
    }

    fn snapshot(&self) -> ColumnStats {
        let mut stats = ColumnStats::new();
        stats.insert(STAT_COUNT.to_string(), self.count as f64);
        if let Some(min) = self.min_length {
            stats.insert(STAT_MIN_LENGTH.to_string(), min as f64);
        }
        if let Some(max) = self.max_length {
            stats.insert(STAT_MAX_LENGTH.to_string(), max as f64);
        }
        stats.insert(STAT_UNIQUE.to_string(), self.distinct.len() as f64);
        stats
    }
}

pub(crate) struct BoolAccumulator {
    nullable: bool,
    count: u64,
    true_count: u64,
    false_count: u64,
}

impl BoolAccumulator {
    fn new(nullable: bool) -> Self {
        BoolAccumulator {
            nullable,
            count: 0,
            true_count: 0,
            false_count: 0,
        }
    }

    fn write(&mut self, value: &Value) {
        if value.is_null() {
            if self.nullable {
                self.count += 1;
            }
            return;
        }
        let Some(b) = value.as_bool() else {
            return;
        };
        self.count += 1;
        if b {
            self.true_count += 1;
        } else {
            self.false_count += 1;
        }
    }

    fn snapshot(&self) -> ColumnStats {
        let mut stats = ColumnStats::new();
        stats.insert(STAT_COUNT.to_string(), self.count as f64);
        stats.insert(STAT_TRUE_COUNT.to_string(), self.true_count as f64);
        stats.insert(STAT_FALSE_COUNT.to_string(), self.false_count as f64);
        stats
    }
}
