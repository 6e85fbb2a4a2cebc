//! Encode command - show the lexical form a code takes in XML.

use std::path::Path;

use clap::Args;
use console::style;
use serde::Serialize;

use etax_core::LexicalValue;

use super::load_registry;

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Code-list id
    list: String,

    /// Codes to encode, or enum constants with --decode
    #[arg(required = true)]
    values: Vec<String>,

    /// Translate enum constants back to codes instead
    #[arg(short, long)]
    decode: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Encoding {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lexical: Option<LexicalValue>,
}

pub fn run(args: EncodeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (_, registry) = load_registry(config_path)?;
    let bridge = registry.bridge(&args.list)?;

    let encodings: Vec<Encoding> = args
        .values
        .iter()
        .map(|input| {
            if args.decode {
                let code = if bridge.uses_constants() {
                    bridge.from_constant(input)
                } else {
                    Some(bridge.resolver().normalize(input)).filter(|c| !c.is_empty())
                };
                Encoding {
                    input: input.clone(),
                    code,
                    lexical: None,
                }
            } else {
                let lexical = bridge.encode(input);
                Encoding {
                    input: input.clone(),
                    code: lexical
                        .as_ref()
                        .map(|_| bridge.resolver().normalize(input)),
                    lexical,
                }
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&encodings)?);
        return Ok(());
    }

    for encoding in &encodings {
        let rendered = match (&encoding.lexical, &encoding.code) {
            (Some(LexicalValue::Constant(constant)), _) => format!("constant {}", constant),
            (Some(LexicalValue::Text(text)), _) => format!("text {}", text),
            (None, Some(code)) => format!("code {}", code),
            (None, None) => style("no lexical form").yellow().to_string(),
        };
        println!("{:?} -> {}", encoding.input, rendered);
    }

    Ok(())
}
