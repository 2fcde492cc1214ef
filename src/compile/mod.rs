//! Compile client: request dispatch and per-tab result handling
//!
//! Each tab runs its own small state machine:
//!
//! ```text
//! Idle ──compile──▶ Compiling ──success──────────▶ Success
//!                   Compiling ──failure/transport─▶ Error
//! Success | Error ──compile──▶ Compiling
//! Success | Error ──clear────▶ Idle
//! ```
//!
//! Requests run on short-lived worker threads and report back through a
//! channel. Results are applied by [`TabId`] on the UI thread in
//! [`CompileClient::poll`], never to "whichever tab is active", so switching
//! or closing tabs while a request is outstanding is safe.

pub mod http;
pub mod protocol;

pub use self::http::{HttpBackend, DEFAULT_ENDPOINT, DEFAULT_MAX_RESPONSE_BYTES};
pub use protocol::{CompileOutcome, CompileRequest, CompileResponse};

use crate::editor::EditorBindings;
use crate::tabs::{TabId, TabRegistry, TabStatus};
use rustc_hash::FxHashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Shown when the service gives no usable failure message
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to compile code";

/// Shown when a successful run printed nothing
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "Program executed successfully (no output)";

/// Something that can turn a request into an outcome. Called from worker threads.
pub trait CompileBackend: Send + Sync {
    fn compile(&self, request: &CompileRequest) -> CompileOutcome;
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no tab with id {0}")]
    UnknownTab(TabId),
    #[error("failed to start compile worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result of one request, tagged with the tab it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileEvent {
    pub tab_id: TabId,
    pub seq: u64,
    pub outcome: CompileOutcome,
}

/// Dispatches compile requests and routes their results back to tabs
pub struct CompileClient {
    backend: Arc<dyn CompileBackend>,
    sender: Sender<CompileEvent>,
    receiver: Receiver<CompileEvent>,
    /// Sequence number of the newest outstanding request per tab
    latest: FxHashMap<TabId, u64>,
    next_seq: u64,
}

impl CompileClient {
    pub fn new(backend: Arc<dyn CompileBackend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        CompileClient {
            backend,
            sender,
            receiver,
            latest: FxHashMap::default(),
            next_seq: 0,
        }
    }

    /// Start compiling tab `id`.
    ///
    /// The tab's code is first refreshed from its live editor buffer, if one
    /// is mounted. On return the tab is `Compiling` with empty output and
    /// error; the result lands on a later [`poll`](Self::poll).
    pub fn compile(
        &mut self,
        registry: &mut TabRegistry,
        bindings: &EditorBindings,
        id: TabId,
    ) -> Result<(), CompileError> {
        bindings.reconcile(registry, id);
        let tab = registry.get_mut(id).ok_or(CompileError::UnknownTab(id))?;
        tab.begin_compile();
        let request = CompileRequest::new(tab.code(), tab.input());

        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest.insert(id, seq);

        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        log::info!(
            "Compiling tab {} (request {}, {} bytes of code)",
            id,
            seq,
            request.code.len()
        );

        let spawned = thread::Builder::new()
            .name(format!("compile-{}", id.0))
            .spawn(move || {
                let outcome = backend.compile(&request);
                // The receiver is gone only if the client was dropped
                let _ = sender.send(CompileEvent {
                    tab_id: id,
                    seq,
                    outcome,
                });
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn compile worker for tab {}: {}", id, e);
            self.latest.remove(&id);
            apply_outcome(registry, id, CompileOutcome::Transport { output: None });
            return Err(CompileError::Spawn(e));
        }
        Ok(())
    }

    /// Apply every result that has arrived. Returns how many were applied.
    pub fn poll(&mut self, registry: &mut TabRegistry) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            if self.handle_event(registry, event) {
                applied += 1;
            }
        }
        applied
    }

    /// Block up to `timeout` for one result, then apply it along with
    /// anything else already queued
    pub fn wait(&mut self, registry: &mut TabRegistry, timeout: Duration) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => {
                let first = usize::from(self.handle_event(registry, event));
                first + self.poll(registry)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    fn handle_event(&mut self, registry: &mut TabRegistry, event: CompileEvent) -> bool {
        match self.latest.get(&event.tab_id) {
            Some(&seq) if seq == event.seq => {
                self.latest.remove(&event.tab_id);
                apply_outcome(registry, event.tab_id, event.outcome)
            }
            Some(&seq) => {
                log::debug!(
                    "Dropping superseded result {} for tab {} (latest is {})",
                    event.seq,
                    event.tab_id,
                    seq
                );
                false
            }
            None => {
                log::debug!("Dropping result for closed tab {}", event.tab_id);
                false
            }
        }
    }

    /// Whether a request for this tab is still outstanding
    pub fn is_pending(&self, id: TabId) -> bool {
        self.latest.contains_key(&id)
    }

    /// Stop tracking a closed tab so its late result is dropped
    pub fn forget(&mut self, id: TabId) {
        self.latest.remove(&id);
    }
}

/// Write an outcome onto the tab with this id.
///
/// Returns false, without touching anything, if the tab no longer exists.
pub fn apply_outcome(registry: &mut TabRegistry, id: TabId, outcome: CompileOutcome) -> bool {
    let Some(tab) = registry.get_mut(id) else {
        return false;
    };

    match outcome {
        CompileOutcome::Success { output } => {
            let output = non_empty(output).unwrap_or_else(|| EMPTY_OUTPUT_PLACEHOLDER.to_string());
            tab.finish_compile(TabStatus::Success, output, String::new());
        }
        CompileOutcome::Failure { message, output } => {
            let message = non_empty(message).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            tab.finish_compile(TabStatus::Error, output.unwrap_or_default(), message);
        }
        CompileOutcome::Transport { output } => {
            tab.finish_compile(
                TabStatus::Error,
                output.unwrap_or_default(),
                GENERIC_FAILURE_MESSAGE.to_string(),
            );
        }
    }
    log::info!("Tab {} finished with status {}", id, tab.status().label());
    true
}

/// Reset a tab's output, error and status. Does nothing while it is compiling.
pub fn clear_output(registry: &mut TabRegistry, id: TabId) -> bool {
    registry.get_mut(id).is_some_and(|tab| tab.clear_result())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
