use serde::{Deserialize, Serialize};

/// Tri-state classification shared by every component comparison (spec.md
/// §4.7). Serializes to the stable string tokens the external JSON
/// contract uses (spec.md §6).
///
/// `ParseError` is carried for wire completeness — the spec's
/// classification table has an "otherwise" row for it — but this core's
/// `Loader` always hands back a typed `Dataset`, never raw bytes that
/// could fail to parse at comparison time, so `classify_by_path` and
/// `classify_by_script` never construct it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum ComponentStatus {
    #[serde(rename = "unmodified")]
    Unmodified,
    #[serde(rename = "add")]
    Added,
    #[serde(rename = "removed")]
    Removed,
    #[serde(rename = "modified")]
    Changed,
    #[serde(rename = "parse error")]
    ParseError,
}

/// Classifies a hash-bearing component (commit, meta, structure) by
/// content-address equality. Returns `None` when the component is absent
/// on both sides, meaning it should be omitted from the report entirely.
pub fn classify_by_path(
    left: Option<&dataset::Path>,
    right: Option<&dataset::Path>,
) -> Option<ComponentStatus> {
    match (left, right) {
        (None, None) => None,
        (Some(_), None) => Some(ComponentStatus::Removed),
        (None, Some(_)) => Some(ComponentStatus::Added),
        (Some(l), Some(r)) if l == r => Some(ComponentStatus::Unmodified),
        (Some(_), Some(_)) => Some(ComponentStatus::Changed),
    }
}

/// Classifies a script component (readme, transform) by exact script-byte
/// equality in place of path equality; an empty string counts as absent
/// (spec.md §4.7).
pub fn classify_by_script(left: Option<&str>, right: Option<&str>) -> Option<ComponentStatus> {
    let norm = |s: Option<&str>| s.filter(|s| !s.is_empty());
    match (norm(left), norm(right)) {
        (None, None) => None,
        (Some(_), None) => Some(ComponentStatus::Removed),
        (None, Some(_)) => Some(ComponentStatus::Added),
        (Some(l), Some(r)) if l == r => Some(ComponentStatus::Unmodified),
        (Some(_), Some(_)) => Some(ComponentStatus::Changed),
    }
}

/// Swaps Added/Removed, leaves everything else unchanged — used by the
/// change-report symmetry property (spec.md §8): `report(A,B).status ==
/// swap(report(B,A).status)`.
pub fn swap(status: ComponentStatus) -> ComponentStatus {
    match status {
        ComponentStatus::Added => ComponentStatus::Removed,
        ComponentStatus::Removed => ComponentStatus::Added,
        other => other,
    }
}
