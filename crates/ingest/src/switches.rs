/// What happened to the diff buffer by the time the pipeline finalized
/// (spec.md §4.5: "diff buffer").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyAction {
    #[default]
    Default,
    Rename,
    /// The body exceeded `BodySizeSmallEnoughToDiff` during ingestion; the
    /// diff buffer was discarded and `Body` is left absent.
    TooBig,
}

/// Caller-supplied configuration knobs (spec.md §4.5, §9: "SaveSwitches").
///
/// `replace_body` and `drop_prev_commit` are consumed directly by
/// `ComputeFieldsPipeline::new`: the former turns an absent current body
/// into a `MissingBody` error instead of falling back to the previous
/// version's body (a caller who asked to replace the body has, by
/// definition, nothing to carry forward); the latter suppresses linking
/// the draft Dataset's `previous_path` to the prior version. `force`,
/// `should_render`, and `convert_format_to_csv` are read by the caller
/// only — the pipeline has no notion of "body unchanged" to bypass, and
/// rendering/format-conversion happen outside ingestion entirely (spec.md
/// §6).
#[derive(Debug, Clone)]
pub struct SaveSwitches {
    pub replace_body: bool,
    pub drop_prev_commit: bool,
    pub force: bool,
    pub should_render: bool,
    pub convert_format_to_csv: bool,
    pub body_action: BodyAction,
}

impl Default for SaveSwitches {
    fn default() -> Self {
        SaveSwitches {
            replace_body: false,
            drop_prev_commit: false,
            force: false,
            should_render: false,
            convert_format_to_csv: false,
            body_action: BodyAction::Default,
        }
    }
}
