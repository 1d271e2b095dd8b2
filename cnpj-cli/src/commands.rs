//! Subcommand implementations

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use cnpj_core::confirm::{self, ConfirmRequest};
use cnpj_core::{branch, cnpj, Company, SearchConfig, SearchEngine};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// One line of `check` output
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub input: String,
    pub normalized: String,
    pub formatted: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment: Option<branch::Establishment>,
}

pub fn check_one(input: &str) -> CheckReport {
    let normalized = cnpj::normalize(input);
    CheckReport {
        input: input.to_string(),
        formatted: cnpj::format(&normalized),
        valid: cnpj::is_valid_checksum(&normalized),
        establishment: branch::establishment(&normalized),
        normalized,
    }
}

/// Print a report per identifier. Returns false if any is invalid.
pub fn check(ids: &[String], out: &mut impl Write) -> Result<bool> {
    let mut all_valid = true;
    for id in ids {
        let report = check_one(id);
        if !report.valid {
            warn!(input = %id, "invalid CNPJ");
            all_valid = false;
        }
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(all_valid)
}

pub fn load_pool(path: &Path) -> Result<Vec<Company>> {
    let data = std::fs::read_to_string(path)?;
    let pool: Vec<Company> = serde_json::from_str(&data)?;
    info!(records = pool.len(), path = %path.display(), "loaded company pool");
    Ok(pool)
}

/// Engine config from an optional JSON file, with `limit` taking precedence.
pub fn load_config(path: Option<&Path>, limit: Option<usize>) -> Result<SearchConfig> {
    let mut config = match path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };

    if let Some(limit) = limit {
        if limit == 0 {
            return Err(Error::Config("limit must be at least 1".to_string()));
        }
        config.max_results = limit;
    }
    Ok(config)
}

pub fn search(
    query: &str,
    pool: &[Company],
    config: SearchConfig,
    out: &mut impl Write,
) -> Result<usize> {
    let engine = SearchEngine::with_config(config);
    let matches = engine.search(query, pool);
    debug!(query, results = matches.len(), "search finished");

    serde_json::to_writer_pretty(&mut *out, &matches)?;
    writeln!(out)?;
    Ok(matches.len())
}

pub struct ResolveArgs<'a> {
    pub current: &'a str,
    pub enriched: &'a str,
    pub before_query: bool,
    pub timeout: Option<Duration>,
}

/// Run the branch resolver, reading answers from `input` when needed.
///
/// `input` is read on its own thread, so a timed-out prompt does not keep
/// the process alive waiting for a line.
pub async fn resolve<B>(args: ResolveArgs<'_>, input: B) -> Result<String>
where
    B: BufRead + Send + 'static,
{
    let (confirmer, requests) = confirm::channel(1);
    let confirmer = match args.timeout {
        Some(limit) => confirmer.with_timeout(limit),
        None => confirmer,
    };

    let prompter = tokio::spawn(answer_prompts(requests, input));

    let resolved = if args.before_query {
        branch::decide_before_query(args.current, |hq, br| confirmer.confirm(hq, br)).await
    } else {
        branch::decide_final(args.current, args.enriched, |hq, br| confirmer.confirm(hq, br)).await
    };

    drop(confirmer);
    prompter.abort();

    Ok(resolved?)
}

/// Answer confirmation requests with lines from `input`.
///
/// The reader thread starts on the first request and is never joined; it
/// dies with the process.
async fn answer_prompts<B>(mut requests: mpsc::Receiver<ConfirmRequest>, input: B)
where
    B: BufRead + Send + 'static,
{
    let mut input = Some(input);
    let mut answers: Option<mpsc::UnboundedReceiver<String>> = None;

    while let Some(request) = requests.recv().await {
        eprint!(
            "{} is a branch. Use headquarters {} instead? [y/N] ",
            cnpj::format(&request.branch),
            cnpj::format(&request.headquarters)
        );

        if answers.is_none() {
            answers = input.take().map(spawn_line_reader);
        }
        let Some(lines) = answers.as_mut() else {
            return;
        };

        match lines.recv().await {
            Some(line) => request.respond(parse_answer(&line)),
            // EOF or read error: leave the request unanswered
            None => return,
        }
    }
}

fn spawn_line_reader<B>(input: B) -> mpsc::UnboundedReceiver<String>
where
    B: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn parse_answer(line: &str) -> bool {
    matches!(
        line.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}
