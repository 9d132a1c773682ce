//! Live preview sessions
//!
//! A session owns one worker task. Edits are debounced; an edit arriving
//! while a cycle is in flight cancels that cycle by dropping its future.
//! Only the result of the latest edit is ever published.
//!
//! ```text
//! Idle -> Debouncing -> Resolving -> Rendering -> Idle
//!             ^              |            |
//!             +-- Canceled <-+------------+   (new edit)
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;
use serde_json::Value as Json;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::PreviewConfig;
use super::RenderedOutput;
use super::assemble;
use super::gather;
use super::output::Mode;
use crate::catalog::Catalog;
use crate::catalog::CatalogContext;
use crate::error::Error;
use crate::model::TableDefinition;
use crate::normalize::normalize;
use crate::pipeline::RequestParams;

/// State of a preview session's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    Idle,
    Debouncing,
    Resolving,
    Rendering,
    Canceled,
}

/// The published outcome of one completed cycle.
#[derive(Debug)]
pub struct PreviewUpdate {
    /// Session that produced the update.
    pub session: Uuid,
    /// Sequence number of the edit this update answers.
    pub seq: u64,
    /// Rendered output, or the cycle's failure.
    pub result: Result<RenderedOutput, Error>,
}

enum Edit {
    Raw(Json),
    Definition(Box<TableDefinition>),
}

struct Request {
    seq: u64,
    edit: Edit,
    params: RequestParams,
}

/// Handle to a running preview session.
///
/// Dropping the handle stops the worker.
pub struct PreviewSession {
    id: Uuid,
    latest: Arc<AtomicU64>,
    requests: mpsc::UnboundedSender<Request>,
    updates: mpsc::Receiver<PreviewUpdate>,
    state: watch::Receiver<PreviewState>,
    cancel: CancellationToken,
}

impl PreviewSession {
    pub(super) fn spawn(catalog: Arc<dyn Catalog>, config: PreviewConfig) -> Self {
        let id = Uuid::new_v4();
        let latest = Arc::new(AtomicU64::new(0));
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(PreviewState::Idle);
        let cancel = CancellationToken::new();

        let worker = Worker {
            id,
            catalog,
            config,
            latest: latest.clone(),
            requests: request_rx,
            updates: update_tx,
            state: state_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(worker.run());
        log::debug!("Started preview session {}", id);

        Self {
            id,
            latest,
            requests: request_tx,
            updates: update_rx,
            state: state_rx,
            cancel,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Submits a raw edit and returns its sequence number.
    pub fn submit(&self, raw: Json, params: RequestParams) -> u64 {
        self.send(Edit::Raw(raw), params)
    }

    /// Submits an already normalized definition and returns its sequence
    /// number.
    pub fn submit_definition(&self, definition: TableDefinition, params: RequestParams) -> u64 {
        self.send(Edit::Definition(Box::new(definition)), params)
    }

    fn send(&self, edit: Edit, params: RequestParams) -> u64 {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if self.requests.send(Request { seq, edit, params }).is_err() {
            log::warn!("Preview session {} is closed, dropping edit {}", self.id, seq);
        }
        seq
    }

    /// Waits for the next published update.
    ///
    /// Returns `None` once the session is closed.
    pub async fn next_update(&mut self) -> Option<PreviewUpdate> {
        self.updates.recv().await
    }

    /// Returns the current worker state.
    pub fn state(&self) -> PreviewState {
        *self.state.borrow()
    }

    /// Returns a receiver that observes state transitions.
    pub fn watch_state(&self) -> watch::Receiver<PreviewState> {
        self.state.clone()
    }

    /// Stops the worker. Any in-flight cycle is dropped unpublished.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("id", &self.id)
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .field("state", &self.state())
            .finish()
    }
}

// =============================================================================
// Worker
// =============================================================================

struct Worker {
    id: Uuid,
    catalog: Arc<dyn Catalog>,
    config: PreviewConfig,
    latest: Arc<AtomicU64>,
    requests: mpsc::UnboundedReceiver<Request>,
    updates: mpsc::Sender<PreviewUpdate>,
    state: watch::Sender<PreviewState>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(mut self) {
        let mut pending: Option<Request> = None;

        loop {
            let mut request = match pending.take() {
                Some(request) => request,
                None => {
                    self.transition(PreviewState::Idle);
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        next = self.requests.recv() => match next {
                            Some(request) => request,
                            None => break,
                        },
                    }
                }
            };

            // Each edit restarts the quiet period.
            self.transition(PreviewState::Debouncing);
            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => return,
                    _ = tokio::time::sleep(self.config.debounce) => break,
                    next = self.requests.recv() => match next {
                        Some(newer) => {
                            log::trace!("Preview {}: edit {} superseded by {}", self.id, request.seq, newer.seq);
                            self.transition(PreviewState::Canceled);
                            self.transition(PreviewState::Debouncing);
                            request = newer;
                        }
                        None => return,
                    },
                }
            }

            let seq = request.seq;
            let outcome = {
                let cycle = cycle(self.catalog.as_ref(), request, &self.state);
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return,
                    result = cycle => Some(result),
                    next = self.requests.recv() => match next {
                        Some(newer) => {
                            log::debug!("Preview {}: canceled cycle {} for edit {}", self.id, seq, newer.seq);
                            self.transition(PreviewState::Canceled);
                            pending = Some(newer);
                            None
                        }
                        None => return,
                    },
                }
            };

            let Some(result) = outcome else {
                continue;
            };

            if seq != self.latest.load(Ordering::SeqCst) {
                // A newer edit was submitted while this cycle finished.
                log::debug!("Preview {}: discarding stale result {}", self.id, seq);
                self.transition(PreviewState::Canceled);
                pending = self.newest_queued();
                continue;
            }

            if let Err(err) = &result {
                log::warn!("Preview {}: cycle {} failed: {}", self.id, seq, err);
            }
            let update = PreviewUpdate {
                session: self.id,
                seq,
                result,
            };
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                sent = self.updates.send(update) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }

        log::debug!("Preview session {} stopped", self.id);
    }

    fn transition(&self, state: PreviewState) {
        transition(&self.state, state);
    }

    /// Takes the newest request already queued, dropping older ones.
    fn newest_queued(&mut self) -> Option<Request> {
        let mut newest = None;
        while let Ok(request) = self.requests.try_recv() {
            newest = Some(request);
        }
        newest
    }
}

fn transition(sender: &watch::Sender<PreviewState>, state: PreviewState) {
    let previous = sender.send_replace(state);
    if previous != state {
        log::trace!("Preview state {:?} -> {:?}", previous, state);
    }
}

/// One resolve/render cycle. Never applies the catalog timeout.
async fn cycle(
    catalog: &dyn Catalog,
    request: Request,
    state: &watch::Sender<PreviewState>,
) -> Result<RenderedOutput, Error> {
    let definition = match request.edit {
        Edit::Raw(raw) => normalize(&raw)?,
        Edit::Definition(definition) => *definition,
    };

    transition(state, PreviewState::Resolving);
    let context = CatalogContext::new(catalog);
    let gathered = gather(&definition, &request.params, &context).await?;

    transition(state, PreviewState::Rendering);
    let output = assemble(&definition, Mode::Preview, gathered);
    for diagnostic in &output.diagnostics {
        log::warn!("[preview {}] {}", output.title, diagnostic);
    }
    Ok(output)
}
