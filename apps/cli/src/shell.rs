//! Line-oriented command loop standing in for the page's buttons.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use client_core::{UploadFile, Workflow};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::present;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Date(String),
    Show,
    Page(usize),
    Next,
    Previous,
    /// Row number on the current page, 1-based.
    Generate(usize),
    GenerateAll,
    Notify(usize),
    NotifyAll,
    Report,
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  upload <path>      upload a csv/xlsx/xls dataset
  date <text>        set the offer date sent with the next upload
  show               redraw the current page
  page <n> | next | prev
  generate <row>     download the letter for a row on this page
  generate-all       download every letter as offer_letters.zip
  notify <row>       email the letter for a row on this page
  notify-all         email every letter and show the delivery report
  report             show the last delivery report
  reset              forget the current dataset
  help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let row = |rest: &str| -> Result<usize, String> {
        match rest.parse::<usize>() {
            Ok(row) if row >= 1 => Ok(row),
            _ => Err(format!("expected a row number, got '{rest}'")),
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "upload" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "upload" => Err("usage: upload <path>".into()),
        "date" if !rest.is_empty() => Ok(Command::Date(rest.to_string())),
        "date" => Err("usage: date <text>".into()),
        "show" | "ls" => Ok(Command::Show),
        "page" => rest
            .parse::<usize>()
            .map(Command::Page)
            .map_err(|_| format!("expected a page number, got '{rest}'")),
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" | "p" => Ok(Command::Previous),
        "generate" | "gen" => row(rest).map(Command::Generate),
        "generate-all" | "gen-all" => Ok(Command::GenerateAll),
        "notify" | "send" => row(rest).map(Command::Notify),
        "notify-all" | "send-all" => Ok(Command::NotifyAll),
        "report" => Ok(Command::Report),
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

pub async fn read_upload(path: &Path, offer_date: &str) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(UploadFile::new(filename, bytes).with_offer_date(offer_date))
}

async fn resolve(workflow: &Workflow, row: usize) -> Option<usize> {
    workflow.resolve_row(row.checked_sub(1)?).await
}

/// Returns `false` once the user asks to quit.
pub async fn execute(workflow: &Workflow, command: Command, offer_date: &mut String) -> bool {
    let effects = match command {
        Command::Upload(path) => match read_upload(&path, offer_date).await {
            Ok(file) => workflow.upload(file).await,
            Err(err) => {
                present::error(&format!("{err:#}"));
                return true;
            }
        },
        Command::Date(date) => {
            *offer_date = date;
            println!("offer date set to {offer_date}");
            return true;
        }
        Command::Show => {
            println!("{}", present::page(&workflow.view().await));
            return true;
        }
        Command::Page(page) => workflow.go_to_page(page).await,
        Command::Next => workflow.next_page().await,
        Command::Previous => workflow.previous_page().await,
        Command::Generate(row) => match resolve(workflow, row).await {
            Some(index) => workflow.generate_one(index).await,
            None => {
                present::error(&format!("no row {row} on this page"));
                return true;
            }
        },
        Command::GenerateAll => workflow.generate_all().await,
        Command::Notify(row) => match resolve(workflow, row).await {
            Some(index) => workflow.notify_one(index).await,
            None => {
                present::error(&format!("no row {row} on this page"));
                return true;
            }
        },
        Command::NotifyAll => workflow.notify_all().await,
        Command::Report => {
            match workflow.bulk_report().await {
                Some(report) => println!("{}", present::report(&report)),
                None => println!("no delivery report yet"),
            }
            return true;
        }
        Command::Reset => workflow.reset().await,
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    };
    present::effects(&effects);
    true
}

pub async fn run(workflow: Arc<Workflow>, mut offer_date: String) -> Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(command) => {
                if !execute(&workflow, command, &mut offer_date).await {
                    break;
                }
            }
            Err(message) if message.is_empty() => {}
            Err(message) => present::error(&message),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
