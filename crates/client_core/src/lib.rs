//! Client-side orchestration of the offer-letter workflow: upload a dataset,
//! page through it, generate letters singly or as an archive, and notify
//! recipients singly or in bulk.

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod inflight;
pub mod pagination;
pub mod reconciler;
pub mod render;
pub mod session;
pub mod sink;
pub mod workflow;

pub use dispatcher::{ActionDispatcher, Artifact, OfferService, UploadFile, UploadOutcome};
pub use error::ActionError;
pub use http::{Endpoints, HttpOfferService};
pub use inflight::{ActionKey, InFlightRegistry, Operation, Target};
pub use reconciler::{BulkReport, BulkReportRow, ResultReconciler, UiEffect};
pub use render::{render_page, ActionControl, PageView, RecordRow};
pub use session::SessionStore;
pub use sink::{ArtifactSink, DirectorySink};
pub use workflow::{Workflow, WorkflowEvent};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
