use std::collections::HashMap;

/// One row of the column-alignment table: a title plus its position in
/// each side's schema-ordered column list, with `None` meaning "absent on
/// that side" (spec.md §4.6 "Column alignment").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub title: String,
    pub left_pos: Option<usize>,
    pub right_pos: Option<usize>,
}

/// Builds the column-alignment table from each side's schema-ordered
/// column list. Unlike the original source's hash-keyed title map (flagged
/// in spec.md §9 as producing non-deterministic iteration order), this
/// builds a `Vec` in two linear passes — left columns first, in their
/// schema order, then any right-only columns appended in their schema
/// order — so the result is reproducible across runs (the §9 open
/// question, resolved in `SPEC_FULL.md` §4.5/§4.6 in favor of
/// determinism).
pub fn align_columns(left: &[dataset::Column], right: &[dataset::Column]) -> Vec<Alignment> {
    let mut table: Vec<Alignment> = Vec::with_capacity(left.len().max(right.len()));
    let mut pos_of: HashMap<String, usize> = HashMap::with_capacity(left.len());

    for (i, column) in left.iter().enumerate() {
        if !pos_of.contains_key(&column.title) {
            pos_of.insert(column.title.clone(), table.len());
            table.push(Alignment {
                title: column.title.clone(),
                left_pos: Some(i),
                right_pos: None,
            });
        }
    }

    for (i, column) in right.iter().enumerate() {
        match pos_of.get(&column.title) {
            Some(&idx) => table[idx].right_pos = Some(i),
            None => {
                pos_of.insert(column.title.clone(), table.len());
                table.push(Alignment {
                    title: column.title.clone(),
                    left_pos: None,
                    right_pos: Some(i),
                });
            }
        }
    }

    table
}
