use crate::alignment::align_columns;
use crate::delta::column_delta;
use crate::error::ChangeReportError;
use crate::status::{classify_by_path, classify_by_script, ComponentStatus};
use crate::summary::StatsSummary;
use dataset::{Column, ColumnStats, Dataset, DatasetRef, LoadSource, Loader, Stats, StatsService};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// One component's comparison: the component payload (or `{}` if absent)
/// on each side, plus its classified status (spec.md §6 "Report JSON
/// shape").
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ComponentDelta {
    pub left: Value,
    pub right: Value,
    pub meta: ComponentMeta,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ComponentMeta {
    pub status: ComponentStatus,
}

/// Which dataset refs produced the left/right sides of the report,
/// carried alongside the report even though `version_info` is never
/// classified by C7 (spec.md §4.6: "it is always present when a dataset
/// loaded successfully").
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct VersionInfo {
    pub left: Value,
    pub right: Value,
    pub meta: VersionInfoMeta,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct VersionInfoMeta {
    pub left_ref: String,
    pub right_ref: String,
}

/// One column's comparison in the stats report.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ColumnDelta {
    pub title: String,
    pub left: ColumnStats,
    pub right: ColumnStats,
    pub delta: ColumnStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ComponentMeta>,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct StatsSummaryDelta {
    pub left: StatsSummary,
    pub right: StatsSummary,
    pub delta: StatsSummary,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct StatsDelta {
    pub summary: StatsSummaryDelta,
    pub columns: Vec<ColumnDelta>,
}

/// The full structured diff of two dataset versions (spec.md §4.6, wire
/// shape stabilized in spec.md §6). Absent components are omitted keys,
/// not `null` — `#[serde(skip_serializing_if)]` on each `Option` field
/// realizes that.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ChangeReport {
    pub version_info: VersionInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<ComponentDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ComponentDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<ComponentDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<ComponentDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<ComponentDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsDelta>,
}

fn component_delta<T: Serialize>(
    left: Option<&T>,
    right: Option<&T>,
    status: Option<ComponentStatus>,
) -> Option<ComponentDelta> {
    let status = status?;
    let to_value = |v: Option<&T>| v.map(|v| serde_json::to_value(v).unwrap_or(Value::Null)).unwrap_or_else(|| json!({}));
    Some(ComponentDelta {
        left: to_value(left),
        right: to_value(right),
        meta: ComponentMeta { status },
    })
}

/// The Change Report Service (spec.md §4.6): diffs two dataset versions,
/// loaded on demand via a `Loader`, filling in missing `Stats` components
/// via a `StatsService`.
pub struct ChangeReportService {
    loader: Arc<dyn Loader>,
    stats_service: Arc<dyn StatsService>,
}

impl ChangeReportService {
    pub fn new(loader: Arc<dyn Loader>, stats_service: Arc<dyn StatsService>) -> Self {
        ChangeReportService { loader, stats_service }
    }

    /// `report(leftRef, rightRef, loadSource) -> ChangeReport` (spec.md
    /// §4.6). When `right_ref.path` is empty, it is substituted with the
    /// left dataset's `previous_path`.
    pub async fn report(
        &self,
        left_ref: &DatasetRef,
        mut right_ref: DatasetRef,
        source: LoadSource,
    ) -> Result<ChangeReport, ChangeReportError> {
        let left = self.loader.load_dataset(left_ref, source).await?;

        if right_ref.path.as_ref().map_or(true, dataset::Path::is_empty) {
            if let Some(prev) = &left.previous_path {
                right_ref.path = Some(prev.clone());
            }
        }
        let right = self.loader.load_dataset(&right_ref, source).await?;

        self.diff(left_ref, &left, &right_ref, &right).await
    }

    async fn diff(
        &self,
        left_ref: &DatasetRef,
        left: &Dataset,
        right_ref: &DatasetRef,
        right: &Dataset,
    ) -> Result<ChangeReport, ChangeReportError> {
        let version_info = VersionInfo {
            left: json!({"path": left.path}),
            right: json!({"path": right.path}),
            meta: VersionInfoMeta {
                left_ref: left_ref.to_string(),
                right_ref: right_ref.to_string(),
            },
        };

        let commit = component_delta(
            left.commit.as_ref(),
            right.commit.as_ref(),
            classify_by_path(
                left.commit.as_ref().map(|c| &c.path),
                right.commit.as_ref().map(|c| &c.path),
            ),
        );
        let meta = component_delta(
            left.meta.as_ref(),
            right.meta.as_ref(),
            classify_by_path(
                left.meta.as_ref().map(|m| &m.path),
                right.meta.as_ref().map(|m| &m.path),
            ),
        );
        let readme = component_delta(
            left.readme.as_ref(),
            right.readme.as_ref(),
            classify_by_script(
                left.readme.as_ref().map(|r| r.script_bytes.as_str()),
                right.readme.as_ref().map(|r| r.script_bytes.as_str()),
            ),
        );
        let structure = component_delta(
            left.structure.as_ref(),
            right.structure.as_ref(),
            classify_by_path(
                left.structure.as_ref().map(|s| &s.path),
                right.structure.as_ref().map(|s| &s.path),
            ),
        );
        let transform = component_delta(
            left.transform.as_ref(),
            right.transform.as_ref(),
            classify_by_script(
                left.transform.as_ref().map(|t| t.script_bytes.as_str()),
                right.transform.as_ref().map(|t| t.script_bytes.as_str()),
            ),
        );

        let stats = self.stats_delta(left, right).await?;

        Ok(ChangeReport {
            version_info,
            commit,
            meta,
            readme,
            structure,
            transform,
            stats,
        })
    }

    async fn stats_delta(
        &self,
        left: &Dataset,
        right: &Dataset,
    ) -> Result<Option<StatsDelta>, ChangeReportError> {
        let (Some(left_structure), Some(right_structure)) = (&left.structure, &right.structure)
        else {
            return Ok(None);
        };

        let left_compiled = schema::CompiledSchema::compile(&left_structure.schema).ok();
        let right_compiled = schema::CompiledSchema::compile(&right_structure.schema).ok();
        let left_columns: Vec<Column> = left_compiled
            .as_ref()
            .map(dataset::columns_of)
            .unwrap_or_default();
        let right_columns: Vec<Column> = right_compiled
            .as_ref()
            .map(dataset::columns_of)
            .unwrap_or_default();

        let left_stats = self.ensure_stats(left).await?;
        let right_stats = self.ensure_stats(right).await?;

        let alignment = align_columns(&left_columns, &right_columns);
        let mut columns = Vec::with_capacity(alignment.len());
        for entry in &alignment {
            let left_column = entry.left_pos.and_then(|i| left_columns.get(i));
            let right_column = entry.right_pos.and_then(|i| right_columns.get(i));
            let left_column_stats = entry.left_pos.and_then(|i| left_stats.per_column.get(i));
            let right_column_stats = entry.right_pos.and_then(|i| right_stats.per_column.get(i));

            let delta = column_delta(
                &entry.title,
                left_column,
                right_column,
                left_column_stats,
                right_column_stats,
            )?;

            let meta = match (entry.left_pos, entry.right_pos) {
                (Some(_), Some(_)) => None,
                (Some(_), None) => Some(ComponentMeta { status: ComponentStatus::Removed }),
                (None, Some(_)) => Some(ComponentMeta { status: ComponentStatus::Added }),
                (None, None) => unreachable!("alignment always registers at least one side"),
            };

            columns.push(ColumnDelta {
                title: entry.title.clone(),
                left: left_column_stats.cloned().unwrap_or_default(),
                right: right_column_stats.cloned().unwrap_or_default(),
                delta,
                meta,
            });
        }

        let left_summary = StatsSummary::of(left);
        let right_summary = StatsSummary::of(right);
        let summary = StatsSummaryDelta {
            left: left_summary,
            right: right_summary,
            delta: StatsSummary::delta(&left_summary, &right_summary),
        };

        tracing::debug!(n_columns = columns.len(), "computed stats delta");
        Ok(Some(StatsDelta { summary, columns }))
    }

    async fn ensure_stats(&self, dataset: &Dataset) -> Result<Stats, ChangeReportError> {
        match &dataset.stats {
            Some(stats) => Ok(stats.clone()),
            None => Ok(self.stats_service.stats(dataset).await?),
        }
    }
}
