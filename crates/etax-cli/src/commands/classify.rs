//! Classify command - split a structured code into its facets.

use std::path::Path;

use clap::Args;
use console::style;
use serde::Serialize;

use etax_core::{Classification, CodeParts};

use super::load_registry;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Code-list id of a structured list, e.g. thai_message_function
    list: String,

    /// Codes to classify
    #[arg(required = true)]
    codes: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One classified input. Blank inputs carry no parts or classification.
#[derive(Serialize)]
struct Report {
    input: String,
    parts: Option<CodeParts>,
    classification: Option<Classification>,
    flags: Vec<String>,
}

pub fn run(args: ClassifyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (_, registry) = load_registry(config_path)?;
    let resolver = registry.resolver(&args.list)?;

    if resolver.policy().structure.is_none() {
        anyhow::bail!("Code list '{}' has no structured code schema", args.list);
    }

    let reports: Vec<Report> = args
        .codes
        .iter()
        .map(|input| {
            let classification = resolver.classify(input);
            Report {
                input: input.clone(),
                flags: classification
                    .as_ref()
                    .map(|c| c.flags().into_iter().collect())
                    .unwrap_or_default(),
                parts: resolver.decompose(input),
                classification,
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}", style(format!("{:?}", report.input)).bold());
        let (Some(parts), Some(classification)) = (&report.parts, &report.classification) else {
            println!("  {}", style("absent").dim());
            continue;
        };
        if parts.is_unclassified() {
            println!("  {}", style("too short to split").yellow());
        } else {
            println!("  prefix:        {}", parts.prefix);
            println!("  suffix:        {}", parts.suffix);
        }
        println!("  document type: {}", classification.document_type_name());
        println!("  category:      {}", classification.category_name());
        println!("  function:      {}", classification.function_name());
        if !report.flags.is_empty() {
            println!("  flags:         {}", report.flags.join(", "));
        }
    }

    Ok(())
}
