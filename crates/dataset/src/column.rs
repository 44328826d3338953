use schema::types::{self, Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tabular column derived from a Structure's body schema (spec.md §3).
/// `ty` is restricted to the subset of JSON types a column's statistics
/// care about: number, integer, string, bool. Columns typed as array,
/// object, or null-only are carried through the schema but produce no
/// `ColumnStats` entry (the Stats Accumulator skips them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Column {
    pub title: String,
    #[serde(skip)]
    #[schemars(skip)]
    pub type_set: Set,
    /// Whether the column's schema admits `null`, which affects whether
    /// nulls are included in `count` (spec.md §4.3).
    pub nullable: bool,
}

impl Column {
    pub fn new(title: impl Into<String>, type_set: Set) -> Self {
        Column {
            title: title.into(),
            nullable: type_set.overlaps(types::NULL),
            type_set,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.type_set.overlaps(types::INT_OR_FRAC)
    }

    pub fn is_string(&self) -> bool {
        self.type_set.overlaps(types::STRING)
    }

    pub fn is_bool(&self) -> bool {
        self.type_set.overlaps(types::BOOLEAN)
    }
}

/// Extract the ordered column list from a compiled body schema, in schema
/// order (spec.md §3: "`Stats.perColumn` has one entry per schema column,
/// in schema order").
pub fn columns_of(compiled: &schema::CompiledSchema) -> Vec<Column> {
    compiled
        .columns()
        .into_iter()
        .map(|(title, ty)| Column::new(title, ty))
        .collect()
}

/// A map of named statistics for one column (spec.md §3). Keys present
/// depend on the column's type: numeric columns carry
/// `{count,min,max,mean,median}`; string columns carry
/// `{count,minLength,maxLength,unique}`; bool columns carry
/// `{count,trueCount,falseCount}`.
///
/// Values are always `f64` in external snapshots (spec.md §4.3: "counts are
/// integers but surface as floating-point ... for uniform delta
/// arithmetic").
pub type ColumnStats = BTreeMap<String, f64>;

pub const STAT_COUNT: &str = "count";
pub const STAT_MIN: &str = "min";
pub const STAT_MAX: &str = "max";
pub const STAT_MEAN: &str = "mean";
pub const STAT_MEDIAN: &str = "median";
pub const STAT_MIN_LENGTH: &str = "minLength";
pub const STAT_MAX_LENGTH: &str = "maxLength";
pub const STAT_UNIQUE: &str = "unique";
pub const STAT_TRUE_COUNT: &str = "trueCount";
pub const STAT_FALSE_COUNT: &str = "falseCount";
