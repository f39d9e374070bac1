//! Plain-text rendering of page views, reports and effects.

use client_core::{pagination::PageLinks, BulkReport, PageView, RecordRow, UiEffect};

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

fn control(row: &RecordRow) -> String {
    let notify = match &row.notify {
        Some(control) if control.enabled => format!("[{}]", control.label),
        Some(control) => format!("({})", control.label),
        None => String::new(),
    };
    format!("[{}] {notify}", row.generate.label)
}

pub fn links(links: &PageLinks) -> String {
    let mut out = Vec::with_capacity(links.pages.len() + 2);
    out.push(if links.previous.enabled {
        "< prev".to_string()
    } else {
        "(prev)".to_string()
    });
    for link in &links.pages {
        out.push(if link.active {
            format!("[{}]", link.page)
        } else {
            link.page.to_string()
        });
    }
    out.push(if links.next.enabled {
        "next >".to_string()
    } else {
        "(next)".to_string()
    });
    out.join(" ")
}

pub fn page(view: &PageView) -> String {
    if view.is_empty() {
        return "no records loaded; use 'upload <path>'".to_string();
    }
    let mut out = format!(
        "{:>3} {:>4}  {:<24} {:<28} {:<14} {:<26} {:<10} {:>10} {:>12}  actions\n",
        "row", "#", "name", "email", "nationality", "program", "duration", "tuition", "first year"
    );
    for row in &view.rows {
        out.push_str(&format!(
            "{:>3} {:>4}  {:<24} {:<28} {:<14} {:<26} {:<10} {:>10} {:>12}  {}\n",
            row.local_index + 1,
            row.global_index + 1,
            row.name,
            row.email,
            row.nationality,
            row.program,
            row.duration,
            row.tuition_fee,
            row.first_year_total,
            control(row)
        ));
    }
    out.push_str(&format!(
        "page {}/{} ({} records)   {}",
        view.page,
        view.page_count,
        view.total_records,
        links(&view.links)
    ));
    out
}

pub fn report(report: &BulkReport) -> String {
    let mut out = format!("{}\n", report.summary());
    for row in &report.rows {
        out.push_str(&format!(
            "  {:<8} {:<24} {}\n",
            row.badge(),
            row.name,
            row.email
        ));
    }
    out.trim_end().to_string()
}

pub fn effects(effects: &[UiEffect]) {
    for effect in effects {
        match effect {
            UiEffect::ShowMessage(message) => println!("{message}"),
            UiEffect::ShowError(message) => error(message),
            UiEffect::SaveArtifact { filename, .. } => println!("received {filename}"),
            UiEffect::ArtifactSaved { path, .. } => println!("saved {}", path.display()),
            UiEffect::UpdateNotifyControl {
                global_index,
                control,
            } => println!("#{} -> {}", global_index + 1, control.label),
            UiEffect::ShowBulkReport(bulk) => println!("{}", report(bulk)),
            UiEffect::Render(view) => println!("{}", page(view)),
        }
    }
}

#[cfg(test)]
#[path = "tests/present_tests.rs"]
mod tests;
