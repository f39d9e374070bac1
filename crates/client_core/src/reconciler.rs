//! Turns dispatcher outcomes into store transitions and UI effects.

use std::path::PathBuf;

use shared::{
    domain::{DeliveryStatus, NotificationStatus, Record},
    protocol::{NotifyAllResponse, NotifyDetail},
};
use tracing::{info, warn};

use crate::{
    dispatcher::{Artifact, UploadOutcome},
    error::ActionError,
    render::{render_page, ActionControl, PageView},
    session::SessionStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    ShowMessage(String),
    /// Non-blocking error display; never accompanied by a state change.
    ShowError(String),
    SaveArtifact {
        filename: String,
        bytes: Vec<u8>,
    },
    ArtifactSaved {
        filename: String,
        path: PathBuf,
    },
    /// In-place update of one row's notify control.
    UpdateNotifyControl {
        global_index: usize,
        control: ActionControl,
    },
    ShowBulkReport(BulkReport),
    Render(PageView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReportRow {
    pub name: String,
    pub email: String,
    pub outcome: DeliveryStatus,
    /// Dataset position this row was matched to, if any.
    pub global_index: Option<usize>,
}

impl BulkReportRow {
    pub fn badge(&self) -> &'static str {
        match self.outcome {
            DeliveryStatus::Sent => "Sent",
            DeliveryStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub message: String,
    pub rows: Vec<BulkReportRow>,
}

impl BulkReport {
    pub fn sent_count(&self) -> usize {
        self.count(DeliveryStatus::Sent)
    }

    pub fn failed_count(&self) -> usize {
        self.count(DeliveryStatus::Failed)
    }

    fn count(&self, outcome: DeliveryStatus) -> usize {
        self.rows.iter().filter(|row| row.outcome == outcome).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({} sent, {} failed of {})",
            self.message,
            self.sent_count(),
            self.failed_count(),
            self.rows.len()
        )
    }
}

/// Owns the bulk report while it is displayed.
#[derive(Debug, Default)]
pub struct ResultReconciler {
    report: Option<BulkReport>,
}

impl ResultReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> Option<&BulkReport> {
        self.report.as_ref()
    }

    pub fn dismiss_report(&mut self) {
        self.report = None;
    }

    pub fn upload(
        &mut self,
        store: &mut SessionStore,
        result: Result<UploadOutcome, ActionError>,
    ) -> Vec<UiEffect> {
        match result {
            Ok(outcome) => {
                let generation = store.set_dataset(outcome.records, outcome.token);
                self.report = None;
                info!(records = store.len(), generation, "dataset replaced");
                vec![
                    UiEffect::ShowMessage(outcome.message),
                    UiEffect::Render(render_page(store)),
                ]
            }
            Err(error) => vec![failure(&error)],
        }
    }

    pub fn reset(&mut self, store: &mut SessionStore) -> Vec<UiEffect> {
        store.clear();
        self.report = None;
        vec![UiEffect::Render(render_page(store))]
    }

    pub fn artifact(
        &mut self,
        filename: String,
        result: Result<Artifact, ActionError>,
    ) -> Vec<UiEffect> {
        match result {
            Ok(artifact) => vec![UiEffect::SaveArtifact {
                filename,
                bytes: artifact.bytes,
            }],
            Err(error) => vec![failure(&error)],
        }
    }

    /// `previous` is the status before the record was marked `Sending`.
    pub fn notify_one(
        &mut self,
        store: &mut SessionStore,
        index: usize,
        previous: NotificationStatus,
        result: Result<String, ActionError>,
    ) -> Vec<UiEffect> {
        let (status, mut effects) = match result {
            Ok(message) => (NotificationStatus::Sent, vec![UiEffect::ShowMessage(message)]),
            Err(error @ ActionError::Busy { .. }) => (previous, vec![failure(&error)]),
            Err(error) => (NotificationStatus::Failed, vec![failure(&error)]),
        };
        // A bulk reply may already have settled the record.
        if store.transition(index, NotificationStatus::Sending, status) {
            effects.push(UiEffect::UpdateNotifyControl {
                global_index: index,
                control: ActionControl::notify(status),
            });
        }
        effects
    }

    pub fn notify_all(
        &mut self,
        store: &mut SessionStore,
        result: Result<NotifyAllResponse, ActionError>,
    ) -> Vec<UiEffect> {
        let response = match result {
            Ok(response) => response,
            Err(error) => return vec![failure(&error)],
        };

        let matches = match_details(store.records(), &response.details);
        let rows: Vec<BulkReportRow> = response
            .details
            .into_iter()
            .zip(matches)
            .map(|(detail, global_index)| {
                if let Some(index) = global_index {
                    match detail.status {
                        DeliveryStatus::Sent => {
                            store.set_status(index, NotificationStatus::Sent);
                        }
                        DeliveryStatus::Failed => {
                            store.transition(
                                index,
                                NotificationStatus::Failed,
                                NotificationStatus::Unsent,
                            );
                        }
                    }
                }
                BulkReportRow {
                    name: detail.name,
                    email: detail.email.unwrap_or_default(),
                    outcome: detail.status,
                    global_index,
                }
            })
            .collect();

        let report = BulkReport {
            message: response.message,
            rows,
        };
        if let Some(total) = response.total {
            if total != report.rows.len() {
                warn!(
                    total,
                    rows = report.rows.len(),
                    "bulk reply total disagrees with its details"
                );
            }
        }
        info!(
            sent = report.sent_count(),
            failed = report.failed_count(),
            "bulk notification reconciled"
        );

        self.report = Some(report.clone());
        vec![
            UiEffect::ShowBulkReport(report),
            UiEffect::Render(render_page(store)),
        ]
    }
}

pub fn failure(error: &ActionError) -> UiEffect {
    UiEffect::ShowError(error.to_string())
}

/// Pairs each bulk row with the first not-yet-matched record carrying the
/// same name and contact address, in dataset order.
fn match_details(records: &[Record], details: &[NotifyDetail]) -> Vec<Option<usize>> {
    let mut taken = vec![false; records.len()];
    details
        .iter()
        .map(|detail| {
            let email = detail.email.as_deref().map(str::trim).unwrap_or_default();
            let found = records.iter().enumerate().position(|(index, record)| {
                !taken[index]
                    && record.name == detail.name
                    && record.contact_address().unwrap_or_default() == email
            });
            if let Some(index) = found {
                taken[index] = true;
            }
            found
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
