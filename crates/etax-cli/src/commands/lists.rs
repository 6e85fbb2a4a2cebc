//! Lists command - inspect the code-list catalog.

use std::path::Path;

use clap::{Args, Subcommand};
use console::style;

use super::load_registry;

/// Arguments for the lists command.
#[derive(Args)]
pub struct ListsArgs {
    #[command(subcommand)]
    command: Option<ListsCommand>,
}

#[derive(Subcommand)]
enum ListsCommand {
    /// Print one policy as JSON
    Show {
        /// Code-list id
        id: String,
    },
}

pub fn run(args: ListsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (_, registry) = load_registry(config_path)?;
    let catalog = registry.catalog();

    match args.command {
        Some(ListsCommand::Show { id }) => {
            let policy = catalog.require(&id)?;
            println!("{}", serde_json::to_string_pretty(&*policy)?);
        }
        None => {
            println!(
                "{:<34} {:<28} {:<7} {:<6} {}",
                style("ID").bold(),
                style("NAME").bold(),
                style("CASE").bold(),
                style("AGENCY").bold(),
                style("FORM").bold()
            );
            for policy in catalog.iter() {
                let case = match policy.case_rule {
                    etax_core::CaseRule::Upper => "upper",
                    etax_core::CaseRule::Lower => "lower",
                    etax_core::CaseRule::Preserve => "none",
                };
                let agency = policy.version.as_ref().map_or("-", |v| v.agency.as_str());
                let mut form = Vec::new();
                if policy.uses_enum_constants() {
                    form.push("enum");
                }
                if policy.structure.is_some() {
                    form.push("structured");
                }
                if policy.active_only {
                    form.push("active-only");
                }
                println!(
                    "{:<34} {:<28} {:<7} {:<6} {}",
                    policy.id,
                    policy.name,
                    case,
                    agency,
                    if form.is_empty() { "text".to_string() } else { form.join(", ") }
                );
            }
            println!();
            println!("{} code lists", catalog.len());
        }
    }

    Ok(())
}
