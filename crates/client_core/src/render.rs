//! Projection of `SessionStore` into a display model. Holds no state.

use shared::domain::{NotificationStatus, Record};

use crate::{
    pagination::{self, PageLinks},
    session::SessionStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    pub label: &'static str,
    pub enabled: bool,
}

impl ActionControl {
    pub fn generate() -> Self {
        Self {
            label: "Download",
            enabled: true,
        }
    }

    pub fn notify(status: NotificationStatus) -> Self {
        let label = match status {
            NotificationStatus::Unsent => "Send Email",
            NotificationStatus::Sending => "Sending...",
            NotificationStatus::Sent => "Sent",
            NotificationStatus::Failed => "Retry Email",
        };
        Self {
            label,
            enabled: status.can_notify(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub global_index: usize,
    pub local_index: usize,
    pub name: String,
    pub email: String,
    pub nationality: String,
    pub program: String,
    pub duration: String,
    pub tuition_fee: String,
    pub first_year_total: String,
    pub generate: ActionControl,
    /// Absent when the record has no contact address.
    pub notify: Option<ActionControl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: usize,
    pub page_count: usize,
    pub total_records: usize,
    pub rows: Vec<RecordRow>,
    pub links: PageLinks,
}

impl PageView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn render_page(store: &SessionStore) -> PageView {
    let page = store.current_page();
    let page_count = store.page_count();
    let range = pagination::window_range(store.len(), page);

    let rows = store.records()[range.clone()]
        .iter()
        .zip(range)
        .enumerate()
        .map(|(local_index, (record, global_index))| {
            let status = store.status(global_index).unwrap_or_default();
            render_row(record, global_index, local_index, status)
        })
        .collect();

    PageView {
        page,
        page_count,
        total_records: store.len(),
        rows,
        links: pagination::page_links(page, page_count),
    }
}

pub fn render_row(
    record: &Record,
    global_index: usize,
    local_index: usize,
    status: NotificationStatus,
) -> RecordRow {
    RecordRow {
        global_index,
        local_index,
        name: record.name.clone(),
        email: record.contact_address().unwrap_or("-").to_string(),
        nationality: record.nationality.clone(),
        program: record.program.clone(),
        duration: record.duration.clone().unwrap_or_else(|| "-".to_string()),
        tuition_fee: format_amount(record.tuition()),
        first_year_total: format_amount(record.first_year_total),
        generate: ActionControl::generate(),
        notify: record
            .contact_address()
            .map(|_| ActionControl::notify(status)),
    }
}

/// `$1500` for integral amounts, `$1500.50` otherwise, `-` when absent.
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value.fract() == 0.0 => format!("${value:.0}"),
        Some(value) => format!("${value:.2}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
