//! CLI smoke entry point.
//!
//! # Responsibility
//! - Boot the shared annotation store from `ANNODESK_DB_URL`.
//! - Drive create/link/page operations for quick local sanity checks.
//! - Keep output deterministic: one line or one JSON document per command.

use annodesk_core::config::DB_URL_ENV;
use annodesk_core::{
    core_version, default_log_level, init_logging, ping, store, EnvConfigProvider,
    NewAnnotation, NewCategory, DEFAULT_LIMIT, DEFAULT_PAGE,
};
use log::warn;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "ANNODESK_LOG_DIR";
const LOG_LEVEL_ENV: &str = "ANNODESK_LOG_LEVEL";

const USAGE: &str = "usage:
  annodesk ping
  annodesk add-annotation <title> [text] [file]
  annodesk add-category <name> [description]
  annodesk link <annotation_id> <category_id>
  annodesk list [page] [limit]";

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    let (command, rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
    if command == "ping" {
        return Ok(format!(
            "annodesk_core ping={} version={}",
            ping(),
            core_version()
        ));
    }

    init_logging_from_env()?;
    store::init(&EnvConfigProvider::default()).map_err(|err| err.to_string())?;

    match (command.as_str(), rest) {
        ("add-annotation", [title, optional @ ..]) if optional.len() <= 2 => {
            let mut annotation = NewAnnotation::new(title.as_str());
            annotation.text = optional.first().cloned();
            annotation.file = optional.get(1).cloned();
            let id = store::create_annotation(&annotation).map_err(|err| err.to_string())?;
            Ok(format!("annotation_id={id}"))
        }
        ("add-category", [name, optional @ ..]) if optional.len() <= 1 => {
            let mut category = NewCategory::new(name.as_str());
            category.description = optional.first().cloned();
            let id = store::create_category(&category).map_err(|err| err.to_string())?;
            Ok(format!("category_id={id}"))
        }
        ("link", [annotation_id, category_id]) => {
            let annotation_id = parse_integer("annotation_id", annotation_id)?;
            let category_id = parse_integer("category_id", category_id)?;
            store::add_category(annotation_id, category_id).map_err(|err| err.to_string())?;
            Ok("linked".to_string())
        }
        ("list", paging) if paging.len() <= 2 => {
            let page = match paging.first() {
                Some(value) => parse_integer("page", value)?,
                None => DEFAULT_PAGE,
            };
            let limit = match paging.get(1) {
                Some(value) => parse_integer("limit", value)?,
                None => DEFAULT_LIMIT,
            };
            let rows = store::get_annotations(page, limit).map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&rows).map_err(|err| err.to_string())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn parse_integer(field: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("{field} must be an integer, got `{value}`"))
}

// File logging is opt-in for the CLI; without a directory nothing is written.
fn init_logging_from_env() -> Result<(), String> {
    let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
        return Ok(());
    };
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    init_logging(&level, &log_dir).map_err(|err| err.to_string())?;
    if std::env::var(DB_URL_ENV).is_err() {
        warn!("event=cli_start module=cli status=warn reason=db_url_unset");
    }
    Ok(())
}
