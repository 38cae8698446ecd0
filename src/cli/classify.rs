//! Classify CLI command
//!
//! Shows what each raw import path would contribute to a guess.

use crate::guess::canonical_name;
use crate::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Raw import paths, exactly as written in source
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    if args.json {
        let classified: BTreeMap<&str, Option<String>> = args
            .paths
            .iter()
            .map(|raw| (raw.as_str(), canonical_name(raw)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }

    for raw in &args.paths {
        match canonical_name(raw) {
            Some(name) => println!("{} -> {}", raw, name.green()),
            None => println!("{} -> {}", raw, "dropped".bright_black()),
        }
    }

    Ok(())
}
