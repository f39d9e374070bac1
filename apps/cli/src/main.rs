use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{DirectorySink, HttpOfferService, Workflow, WorkflowEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod present;
mod shell;

#[derive(Parser, Debug)]
#[command(about = "Upload a student dataset, then generate and email offer letters")]
struct Args {
    /// Base URL of the offer-letter service.
    #[arg(long)]
    server_url: Option<String>,
    /// Where generated letters and archives are saved.
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Dataset to upload before the prompt opens.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Offer date printed on the letters; defaults to today.
    #[arg(long)]
    date: Option<String>,
}

fn default_offer_date() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(download_dir) = args.download_dir {
        settings.download_dir = download_dir;
    }
    let server_url = config::validate_server_url(&settings.server_url)?;

    let service = HttpOfferService::with_timeout(
        &server_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let workflow = Arc::new(Workflow::new(
        Arc::new(service),
        Arc::new(DirectorySink::new(&settings.download_dir)),
    ));
    info!(%server_url, download_dir = %settings.download_dir.display(), "offer client ready");

    let mut events = workflow.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(WorkflowEvent::BusyStarted { label, .. }) => eprintln!("{label}"),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut offer_date = args.date.unwrap_or_else(default_offer_date);
    if let Some(path) = args.file {
        shell::execute(&workflow, shell::Command::Upload(path), &mut offer_date).await;
    }

    shell::run(workflow, offer_date).await
}
