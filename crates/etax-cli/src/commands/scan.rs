//! Scan command - resolve the coded elements of an e-Tax XML document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Serialize;
use tracing::{debug, info, warn};

use etax_core::{CollectingSink, Diagnostic, Resolver};

use super::{Status, load_registry};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// XML document to scan
    #[arg(required = true)]
    input: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Exit with an error when any code resolves to a placeholder
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
struct Finding {
    path: String,
    list: String,
    value: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

#[derive(Serialize)]
struct ScanReport {
    file: String,
    findings: Vec<Finding>,
    diagnostics: Vec<Diagnostic>,
}

pub fn run(args: ScanArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let (config, registry) = load_registry(config_path)?;
    // Diagnostics are only collected into the report when warnings are on.
    let sink = Arc::new(CollectingSink::new());
    let registry = if config.diagnostics.emit_warnings {
        registry.with_sink(sink.clone())
    } else {
        registry
    };

    info!("Scanning {}", args.input.display());
    let content = fs::read_to_string(&args.input)?;

    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut resolvers: HashMap<String, Option<Resolver>> = HashMap::new();
    let mut findings = Vec::new();

    loop {
        let value = match reader.read_event()? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                continue;
            }
            Event::End(_) => {
                path.pop();
                continue;
            }
            Event::Text(text) => text.unescape()?.into_owned(),
            Event::CData(cdata) => String::from_utf8_lossy(&cdata).into_owned(),
            Event::Eof => break,
            _ => continue,
        };

        let Some(list) = config.scan.list_for(&path) else {
            continue;
        };
        let resolver = resolvers
            .entry(list.to_string())
            .or_insert_with(|| match registry.resolver(list) {
                Ok(resolver) => Some(resolver),
                Err(e) => {
                    warn!("Skipping elements mapped to '{}': {}", list, e);
                    None
                }
            });
        let Some(resolver) = resolver else {
            continue;
        };

        let record = resolver.resolve(&value);
        debug!("{} = {:?} -> {:?}", path.join("/"), value, record.as_ref().map(|r| &r.code));

        findings.push(Finding {
            path: path.join("/"),
            list: list.to_string(),
            status: Status::of(record.as_ref()),
            code: record.as_ref().map(|r| r.code.clone()),
            display_name: record.map(|r| r.display_name),
            value,
        });
    }

    let report = ScanReport {
        file: args.input.display().to_string(),
        findings,
        diagnostics: sink.take(),
    };
    let placeholders = report
        .findings
        .iter()
        .filter(|f| f.status == Status::Placeholder)
        .count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report, placeholders);
    }

    if args.strict && placeholders > 0 {
        anyhow::bail!("{} unresolved code(s) in {}", placeholders, report.file);
    }

    Ok(())
}

fn print_text(report: &ScanReport, placeholders: usize) {
    for finding in &report.findings {
        let marker = match finding.status {
            Status::Resolved => style("✓").green(),
            Status::Placeholder => style("?").yellow(),
            Status::Absent => style("-").dim(),
        };
        println!(
            "{} {:<24} {:<12} {}",
            marker,
            finding.list,
            finding.code.as_deref().unwrap_or(""),
            finding.display_name.as_deref().unwrap_or("")
        );
    }

    for diagnostic in &report.diagnostics {
        println!("{} {}", style("warning:").yellow(), diagnostic);
    }

    println!();
    println!(
        "{} {} coded elements, {} unresolved",
        style("ℹ").blue(),
        report.findings.len(),
        placeholders
    );
}
