use crate::error::IngestError;
use crate::state::{DraftState, Phase, PhaseHandle};
use crate::switches::{BodyAction, SaveSwitches};
use dataset::{Clock, Column, Commit, Dataset};
use schema::CompiledSchema;
use serde_json::Value;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::oneshot;
use tokio_util::io::SyncIoBridge;
use tokio_util::sync::CancellationToken;

/// Entries are flushed to the Schema Validator every `BATCH_SIZE` rows
/// (spec.md §4.5: "order of 1000").
const BATCH_SIZE: usize = 1000;

/// Default threshold below which the diff buffer survives to EOF and gets
/// inlined into `Body` (spec.md §4.5, the spec's own example value).
pub const DEFAULT_DIFF_THRESHOLD: u64 = 1024 * 1024;

enum ReadPhase {
    AwaitInner,
    Tee {
        start: usize,
        offset: usize,
        end: usize,
    },
    Eof,
}

enum Mode<R> {
    /// Bytes from `inner` are teed into `tee_tx` for the background
    /// decoder while being returned to the caller unchanged.
    Streaming {
        inner: R,
        tee_tx: tokio::io::DuplexStream,
        read_phase: ReadPhase,
    },
    /// The current body is absent but a previous version's body is being
    /// replayed verbatim; no decode/validate/accumulate happens (spec.md
    /// §9: "copy, don't recompute").
    CopyPrevious {
        inner: R,
    },
}

/// The central concurrency object (spec.md §4.5). Wraps a caller-supplied
/// body reader, exposing the same bytes back out while teeing them to a
/// background decoder task that drives the Schema Validator, Stats
/// Accumulator, and Depth Probe, and that finalizes the draft Dataset's
/// `Structure`/`Stats`/`Body` fields on EOF.
pub struct ComputeFieldsPipeline<R> {
    mode: Mode<R>,
    draft: Arc<tokio::sync::Mutex<DraftState>>,
    bytes_read: Arc<AtomicU64>,
    body_action: Arc<StdMutex<BodyAction>>,
    phase: PhaseHandle,
    cancel: CancellationToken,
    completion: Option<oneshot::Receiver<Result<(), IngestError>>>,
    cached_result: Option<Result<(), IngestError>>,
}

impl<R> ComputeFieldsPipeline<R>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    /// Constructs a pipeline over `body_reader`. `body_present` tells the
    /// pipeline whether `body_reader` is the current body or a fallback
    /// read of the previous version's body (spec.md §4.5: "Construction-
    /// time invariants"). `draft` must already have its `Structure`
    /// schema/format set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mut draft: Dataset,
        previous: Option<Dataset>,
        body_present: bool,
        body_reader: R,
        mut commit: Commit,
        clock: &dyn Clock,
        switches: SaveSwitches,
        cancel: CancellationToken,
    ) -> Result<Self, IngestError> {
        if !body_present && (previous.is_none() || switches.replace_body) {
            return Err(IngestError::MissingBody);
        }

        commit.timestamp = clock.now();
        draft.commit = Some(commit);
        if let Some(prev) = &previous {
            if !switches.drop_prev_commit {
                draft.previous_path = Some(prev.path.clone());
            }
        }

        let phase = PhaseHandle::new();
        let body_action = Arc::new(StdMutex::new(switches.body_action));

        if !body_present {
            let previous = previous.expect("checked above");
            if let Some(prev_structure) = previous.structure {
                if let Some(structure) = draft.structure.as_mut() {
                    structure.entries = prev_structure.entries;
                    structure.depth = prev_structure.depth;
                    structure.err_count = prev_structure.err_count;
                    structure.length = prev_structure.length;
                }
            }
            draft.body = previous.body;
            draft.stats = previous.stats;
            phase.set(Phase::Finalized);

            return Ok(ComputeFieldsPipeline {
                mode: Mode::CopyPrevious { inner: body_reader },
                draft: Arc::new(tokio::sync::Mutex::new(DraftState { dataset: draft })),
                bytes_read: Arc::new(AtomicU64::new(0)),
                body_action,
                phase,
                cancel,
                completion: None,
                cached_result: Some(Ok(())),
            });
        }

        let structure = draft
            .structure
            .clone()
            .expect("draft Structure must be set before construction");
        let compiled = Arc::new(CompiledSchema::compile(&structure.schema)?);
        let columns = Arc::new(dataset::columns_of(&compiled));

        let (tee_tx, tee_rx) = tokio::io::duplex(64 * 1024);
        let draft = Arc::new(tokio::sync::Mutex::new(DraftState { dataset: draft }));
        let bytes_read = Arc::new(AtomicU64::new(0));
        let (done_tx, done_rx) = oneshot::channel();

        phase.set(Phase::Streaming);
        spawn_decoder(
            tee_rx,
            structure.format,
            columns,
            compiled,
            structure.strict,
            DEFAULT_DIFF_THRESHOLD,
            draft.clone(),
            bytes_read.clone(),
            body_action.clone(),
            cancel.clone(),
            phase.clone(),
            done_tx,
        );

        Ok(ComputeFieldsPipeline {
            mode: Mode::Streaming {
                inner: body_reader,
                tee_tx,
                read_phase: ReadPhase::AwaitInner,
            },
            draft,
            bytes_read,
            body_action,
            phase,
            cancel,
            completion: Some(done_rx),
            cached_result: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn body_action(&self) -> BodyAction {
        *self.body_action.lock().unwrap()
    }

    /// Awaits finalization and returns the finalized draft Dataset. Callers
    /// must have already driven this pipeline's `AsyncRead` impl to EOF
    /// (e.g. via `tokio::io::copy`) before calling this, since the
    /// background decoder only finishes after observing EOF on the tee.
    pub async fn finish(mut self) -> Result<Dataset, IngestError> {
        let result = match self.completion.take() {
            Some(rx) => match rx.await {
                Ok(result) => result,
                Err(_) => Err(IngestError::Io("decoder task dropped without a result".into())),
            },
            None => self.cached_result.clone().unwrap_or(Ok(())),
        };

        match &result {
            Ok(()) => self.phase.set(Phase::Finalized),
            Err(err) => self.phase.set(Phase::Failed(err.clone())),
        }
        result?;

        let dataset = match Arc::try_unwrap(self.draft) {
            Ok(mutex) => mutex.into_inner().dataset,
            Err(arc) => arc.lock().await.dataset.clone(),
        };
        Ok(dataset)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ComputeFieldsPipeline<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            this.phase.set(Phase::Failed(IngestError::Cancelled));
            return Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                IngestError::Cancelled,
            )));
        }

        match &mut this.mode {
            Mode::CopyPrevious { inner } => Pin::new(inner).poll_read(cx, buf),
            Mode::Streaming {
                inner,
                tee_tx,
                read_phase,
            } => loop {
                match read_phase {
                    ReadPhase::AwaitInner => {
                        let start = buf.filled().len();
                        match Pin::new(&mut *inner).poll_read(cx, buf) {
                            Poll::Pending => return Poll::Pending,
                            Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                            Poll::Ready(Ok(())) => {
                                let end = buf.filled().len();
                                if end == start {
                                    *read_phase = ReadPhase::Eof;
                                    this.phase.set(Phase::Draining);
                                    // Dropping tee_tx (on the next poll, or
                                    // here via shutdown) signals EOF to the
                                    // background decoder.
                                    let _ = Pin::new(&mut *tee_tx).poll_shutdown(cx);
                                    return Poll::Ready(Ok(()));
                                }
                                *read_phase = ReadPhase::Tee { start, offset: start, end };
                            }
                        }
                    }
                    ReadPhase::Tee { start, offset, end } => {
                        if *offset < *end {
                            match Pin::new(&mut *tee_tx).poll_write(cx, &buf.filled()[*offset..*end])
                            {
                                Poll::Pending => return Poll::Pending,
                                Poll::Ready(Err(_)) => {
                                    // Decoder side is gone (likely failed);
                                    // stop teeing but keep serving the
                                    // caller's read — the stored error
                                    // surfaces via `finish()`.
                                    *read_phase = ReadPhase::AwaitInner;
                                    return Poll::Ready(Ok(()));
                                }
                                Poll::Ready(Ok(0)) => {
                                    *read_phase = ReadPhase::AwaitInner;
                                    return Poll::Ready(Ok(()));
                                }
                                Poll::Ready(Ok(n)) => *offset += n,
                            }
                        } else {
                            this.bytes_read.fetch_add((*end - *start) as u64, Ordering::Relaxed);
                            *read_phase = ReadPhase::AwaitInner;
                            return Poll::Ready(Ok(()));
                        }
                    }
                    ReadPhase::Eof => return Poll::Ready(Ok(())),
                }
            },
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_decoder(
    tee_rx: tokio::io::DuplexStream,
    format: dataset::Format,
    columns: Arc<Vec<Column>>,
    compiled: Arc<CompiledSchema>,
    strict: bool,
    diff_threshold: u64,
    draft: Arc<tokio::sync::Mutex<DraftState>>,
    bytes_read: Arc<AtomicU64>,
    body_action: Arc<StdMutex<BodyAction>>,
    cancel: CancellationToken,
    phase: PhaseHandle,
    done_tx: oneshot::Sender<Result<(), IngestError>>,
) {
    tokio::spawn(async move {
        let sync_reader = SyncIoBridge::new(tee_rx);
        let join_result = tokio::task::spawn_blocking(move || {
            decode_and_accumulate(
                sync_reader,
                format,
                &columns,
                &compiled,
                strict,
                diff_threshold,
                &draft,
                &bytes_read,
                &body_action,
                &cancel,
            )
        })
        .await;

        let result = match join_result {
            Ok(result) => result,
            Err(join_err) => Err(IngestError::Io(join_err.to_string())),
        };
        match &result {
            Ok(()) => phase.set(Phase::Finalized),
            Err(err) => phase.set(Phase::Failed(err.clone())),
        }
        let _ = done_tx.send(result);
    });
}

#[allow(clippy::too_many_arguments)]
fn decode_and_accumulate(
    reader: SyncIoBridge<tokio::io::DuplexStream>,
    format: dataset::Format,
    columns: &[Column],
    compiled: &CompiledSchema,
    strict: bool,
    diff_threshold: u64,
    draft: &Arc<tokio::sync::Mutex<DraftState>>,
    bytes_read: &Arc<AtomicU64>,
    body_action: &Arc<StdMutex<BodyAction>>,
    cancel: &CancellationToken,
) -> Result<(), IngestError> {
    let entries = parser::decode(format, columns, reader)?;
    let mut acc = stats::Accumulator::new(columns);
    let mut max_depth = 0usize;
    let mut entries_count = 0usize;
    let mut err_count = 0usize;
    let mut batch: Vec<Value> = Vec::new();
    let mut diff_buffer: Option<Vec<Value>> = Some(Vec::new());

    for result in entries {
        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }
        let entry = result?;
        entries_count += 1;
        max_depth = max_depth.max(dataset::depth_of(&entry.value));
        acc.write(&entry.value);
        batch.push(entry.value.clone());
        if let Some(buf) = diff_buffer.as_mut() {
            buf.push(entry.value);
        }

        if batch.len() >= BATCH_SIZE {
            flush_batch(compiled, strict, &mut batch, &mut err_count)?;
            if diff_buffer.is_some() && bytes_read.load(Ordering::Relaxed) > diff_threshold {
                diff_buffer = None;
                *body_action.lock().unwrap() = BodyAction::TooBig;
            }
        }
    }
    flush_batch(compiled, strict, &mut batch, &mut err_count)?;
    if diff_buffer.is_some() && bytes_read.load(Ordering::Relaxed) > diff_threshold {
        diff_buffer = None;
        *body_action.lock().unwrap() = BodyAction::TooBig;
    }

    acc.close();
    let snapshot = acc.snapshot().map_err(|_| IngestError::StatsFinalize)?;

    let mut guard = draft.blocking_lock();
    let length = bytes_read.load(Ordering::Relaxed) as usize;
    if let Some(structure) = guard.dataset.structure.as_mut() {
        structure.entries = entries_count;
        structure.depth = max_depth + 1;
        structure.err_count = err_count;
        structure.length = length;
    }
    guard.dataset.stats = Some(dataset::Stats {
        path: dataset::Path::default(),
        per_column: snapshot,
    });
    guard.dataset.body = match diff_buffer {
        Some(entries) => dataset::Body::Inline(entries),
        None => dataset::Body::Absent,
    };
    drop(guard);

    tracing::debug!(entries_count, err_count, length, "compute-fields pipeline finalized");
    Ok(())
}

fn flush_batch(
    compiled: &CompiledSchema,
    strict: bool,
    batch: &mut Vec<Value>,
    err_count: &mut usize,
) -> Result<(), IngestError> {
    if batch.is_empty() {
        return Ok(());
    }
    let array = Value::Array(std::mem::take(batch));
    let errors = schema::validate_batch(compiled, &array);
    *err_count += errors;
    if strict && errors > 0 {
        return Err(IngestError::StrictValidation(*err_count));
    }
    tracing::debug!(errors, "flushed validation batch");
    Ok(())
}
