//! Resolve command - look up codes in one code list.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;

use etax_core::CodeRecord;

use super::{OutputFormat, Status, load_registry};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Code-list id (see `etax lists`)
    list: String,

    /// Codes to resolve
    #[arg(required = true)]
    codes: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with an error when a code resolves to a placeholder
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
struct Resolution {
    input: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<CodeRecord>,
}

pub fn run(args: ResolveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (_, registry) = load_registry(config_path)?;
    let resolver = registry.resolver(&args.list)?;

    let resolutions: Vec<Resolution> = args
        .codes
        .iter()
        .map(|input| {
            let record = resolver.resolve(input);
            Resolution {
                input: input.clone(),
                status: Status::of(record.as_ref()),
                record,
            }
        })
        .collect();

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&resolutions)?,
        OutputFormat::Csv => format_csv(&resolutions)?,
        OutputFormat::Text => format_text(&args.list, &resolutions),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let placeholders = resolutions
        .iter()
        .filter(|r| r.status == Status::Placeholder)
        .count();
    if args.strict && placeholders > 0 {
        anyhow::bail!("{} code(s) in '{}' could not be resolved", placeholders, args.list);
    }

    Ok(())
}

fn format_csv(resolutions: &[Resolution]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "input",
        "status",
        "code",
        "display_name",
        "display_name_th",
        "category",
        "flags",
    ])?;

    for resolution in resolutions {
        let record = resolution.record.as_ref();
        let flags = record
            .map(|r| r.flags.iter().cloned().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        wtr.write_record([
            resolution.input.as_str(),
            resolution.status.as_str(),
            record.map_or("", |r| r.code.as_str()),
            record.map_or("", |r| r.display_name.as_str()),
            record.and_then(|r| r.display_name_th.as_deref()).unwrap_or(""),
            record.and_then(|r| r.category.as_deref()).unwrap_or(""),
            flags.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(list: &str, resolutions: &[Resolution]) -> String {
    let mut output = String::new();

    for resolution in resolutions {
        let Some(record) = &resolution.record else {
            output.push_str(&format!("{:?}: {}\n", resolution.input, style("absent").dim()));
            continue;
        };

        let marker = match resolution.status {
            Status::Resolved => style("✓").green(),
            _ => style("?").yellow(),
        };
        output.push_str(&format!(
            "{} {} {} - {}\n",
            marker, list, record.code, record.display_name
        ));
        if let Some(thai) = &record.display_name_th {
            output.push_str(&format!("    {}\n", thai));
        }
        if let Some(category) = &record.category {
            output.push_str(&format!("    category: {}\n", category));
        }
        if !record.flags.is_empty() {
            let flags: Vec<&str> = record.flags.iter().map(String::as_str).collect();
            output.push_str(&format!("    flags: {}\n", flags.join(", ")));
        }
    }

    output.trim_end().to_string()
}
