//! One user action in, effects out: UI event -> dispatcher -> service ->
//! reconciler -> store. The session store sits behind a mutex that is never
//! held across a network call.

use std::sync::Arc;

use shared::domain::{NotificationStatus, SessionToken, ARCHIVE_FILENAME};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, warn};

use crate::{
    dispatcher::{ActionDispatcher, OfferService, UploadFile},
    error::ActionError,
    inflight::{ActionKey, Operation},
    reconciler::{failure, BulkReport, ResultReconciler, UiEffect},
    render::{render_page, PageView},
    session::SessionStore,
    sink::ArtifactSink,
};

#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    BusyStarted { key: ActionKey, label: &'static str },
    BusyFinished { key: ActionKey },
    Effect(UiEffect),
}

struct WorkflowState {
    store: SessionStore,
    reconciler: ResultReconciler,
}

pub struct Workflow {
    dispatcher: ActionDispatcher,
    sink: Arc<dyn ArtifactSink>,
    state: Mutex<WorkflowState>,
    events: broadcast::Sender<WorkflowEvent>,
}

/// Snapshot taken before a request is sent.
struct Pending {
    token: SessionToken,
    generation: u64,
}

impl Workflow {
    pub fn new(service: Arc<dyn OfferService>, sink: Arc<dyn ArtifactSink>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            dispatcher: ActionDispatcher::new(service),
            sink,
            state: Mutex::new(WorkflowState {
                store: SessionStore::new(),
                reconciler: ResultReconciler::new(),
            }),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub async fn view(&self) -> PageView {
        render_page(&self.state.lock().await.store)
    }

    pub async fn bulk_report(&self) -> Option<BulkReport> {
        self.state.lock().await.reconciler.report().cloned()
    }

    pub async fn status(&self, index: usize) -> Option<NotificationStatus> {
        self.state.lock().await.store.status(index)
    }

    pub async fn record_count(&self) -> usize {
        self.state.lock().await.store.len()
    }

    pub async fn go_to_page(&self, page: usize) -> Vec<UiEffect> {
        let mut state = self.state.lock().await;
        state.store.set_page(page);
        self.publish(vec![UiEffect::Render(render_page(&state.store))])
    }

    pub async fn next_page(&self) -> Vec<UiEffect> {
        let mut state = self.state.lock().await;
        state.store.next_page();
        self.publish(vec![UiEffect::Render(render_page(&state.store))])
    }

    pub async fn previous_page(&self) -> Vec<UiEffect> {
        let mut state = self.state.lock().await;
        state.store.previous_page();
        self.publish(vec![UiEffect::Render(render_page(&state.store))])
    }

    /// Global index of row `local_index` on the current page.
    pub async fn resolve_row(&self, local_index: usize) -> Option<usize> {
        self.state.lock().await.store.resolve_local(local_index)
    }

    pub async fn reset(&self) -> Vec<UiEffect> {
        let mut state = self.state.lock().await;
        let WorkflowState { store, reconciler } = &mut *state;
        let effects = reconciler.reset(store);
        self.publish(effects)
    }

    pub async fn upload(&self, file: UploadFile) -> Vec<UiEffect> {
        if let Err(err) = file.validate() {
            return self.publish(vec![failure(&err)]);
        }
        let generation = self.state.lock().await.store.generation();

        let key = ActionKey::all(Operation::Upload);
        self.busy(key);
        let result = self.dispatcher.upload(&file).await;
        self.idle(key);

        let mut state = self.state.lock().await;
        if state.store.generation() != generation {
            warn!("dataset changed while uploading; ignoring upload reply");
            return Vec::new();
        }
        let WorkflowState { store, reconciler } = &mut *state;
        let effects = reconciler.upload(store, result);
        self.publish(effects)
    }

    pub async fn generate_one(&self, index: usize) -> Vec<UiEffect> {
        let prepared = {
            let state = self.state.lock().await;
            prepare(&state.store).and_then(|pending| {
                let record = state.store.checked_record(index)?;
                Ok((pending, record.artifact_filename()))
            })
        };
        let (pending, filename) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return self.publish(vec![failure(&err)]),
        };

        let key = ActionKey::one(Operation::GenerateOne, index);
        self.busy(key);
        let result = self.dispatcher.generate_one(&pending.token, index).await;
        self.idle(key);

        let effects = {
            let mut state = self.state.lock().await;
            if is_stale(&state.store, &pending, Operation::GenerateOne) {
                return Vec::new();
            }
            state.reconciler.artifact(filename, result)
        };
        let effects = self.save_artifacts(effects).await;
        self.publish(effects)
    }

    pub async fn generate_all(&self) -> Vec<UiEffect> {
        let pending = match prepare(&self.state.lock().await.store) {
            Ok(pending) => pending,
            Err(err) => return self.publish(vec![failure(&err)]),
        };

        let key = ActionKey::all(Operation::GenerateAll);
        self.busy(key);
        let result = self.dispatcher.generate_all(&pending.token).await;
        self.idle(key);

        let effects = {
            let mut state = self.state.lock().await;
            if is_stale(&state.store, &pending, Operation::GenerateAll) {
                return Vec::new();
            }
            state
                .reconciler
                .artifact(ARCHIVE_FILENAME.to_string(), result)
        };
        let effects = self.save_artifacts(effects).await;
        self.publish(effects)
    }

    pub async fn notify_one(&self, index: usize) -> Vec<UiEffect> {
        let prepared = {
            let mut state = self.state.lock().await;
            prepare_notify(&mut state.store, index)
        };
        let (pending, previous) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return self.publish(vec![failure(&err)]),
        };

        let key = ActionKey::one(Operation::NotifyOne, index);
        self.busy(key);
        let result = self.dispatcher.notify_one(&pending.token, index).await;
        self.idle(key);

        let mut state = self.state.lock().await;
        if is_stale(&state.store, &pending, Operation::NotifyOne) {
            return Vec::new();
        }
        let WorkflowState { store, reconciler } = &mut *state;
        let effects = reconciler.notify_one(store, index, previous, result);
        self.publish(effects)
    }

    pub async fn notify_all(&self) -> Vec<UiEffect> {
        let pending = match prepare(&self.state.lock().await.store) {
            Ok(pending) => pending,
            Err(err) => return self.publish(vec![failure(&err)]),
        };

        let key = ActionKey::all(Operation::NotifyAll);
        self.busy(key);
        let result = self.dispatcher.notify_all(&pending.token).await;
        self.idle(key);

        let mut state = self.state.lock().await;
        if is_stale(&state.store, &pending, Operation::NotifyAll) {
            return Vec::new();
        }
        let WorkflowState { store, reconciler } = &mut *state;
        let effects = reconciler.notify_all(store, result);
        self.publish(effects)
    }

    async fn save_artifacts(&self, effects: Vec<UiEffect>) -> Vec<UiEffect> {
        let mut applied = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                UiEffect::SaveArtifact { filename, bytes } => {
                    match self.sink.save(&filename, &bytes).await {
                        Ok(path) => applied.push(UiEffect::ArtifactSaved { filename, path }),
                        Err(err) => {
                            error!(%filename, error = %err, "failed to save artifact");
                            applied.push(UiEffect::ShowError(format!(
                                "Failed to save {filename}: {err}"
                            )));
                        }
                    }
                }
                other => applied.push(other),
            }
        }
        applied
    }

    fn busy(&self, key: ActionKey) {
        let _ = self.events.send(WorkflowEvent::BusyStarted {
            key,
            label: key.operation.busy_label(),
        });
    }

    fn idle(&self, key: ActionKey) {
        let _ = self.events.send(WorkflowEvent::BusyFinished { key });
    }

    fn publish(&self, effects: Vec<UiEffect>) -> Vec<UiEffect> {
        for effect in &effects {
            let _ = self.events.send(WorkflowEvent::Effect(effect.clone()));
        }
        effects
    }
}

fn prepare(store: &SessionStore) -> Result<Pending, ActionError> {
    Ok(Pending {
        token: store.require_token()?.clone(),
        generation: store.generation(),
    })
}

/// Validates the record and marks it `Sending`; returns its prior status.
fn prepare_notify(
    store: &mut SessionStore,
    index: usize,
) -> Result<(Pending, NotificationStatus), ActionError> {
    let pending = prepare(store)?;
    let record = store.checked_record(index)?;
    if record.contact_address().is_none() {
        return Err(ActionError::NoContactAddress { index });
    }
    let previous = store.status(index).unwrap_or_default();
    match previous {
        NotificationStatus::Sending => {
            return Err(ActionError::Busy {
                key: ActionKey::one(Operation::NotifyOne, index),
            })
        }
        NotificationStatus::Sent => return Err(ActionError::AlreadySent { index }),
        NotificationStatus::Unsent | NotificationStatus::Failed => {}
    }
    store.set_status(index, NotificationStatus::Sending);
    Ok((pending, previous))
}

fn is_stale(store: &SessionStore, pending: &Pending, operation: Operation) -> bool {
    let stale = store.generation() != pending.generation;
    if stale {
        warn!(
            operation = operation.as_str(),
            "dataset replaced while request was outstanding; ignoring reply"
        );
    }
    stale
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
