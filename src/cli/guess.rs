//! Guess CLI command
//!
//! Scans a source tree and prints the external packages it imports.

use crate::cli::ScanArgs;
use crate::guess::guess_bare_imports;
use crate::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct GuessArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

pub async fn run(args: GuessArgs) -> Result<()> {
    let (root, config) = args.scan.resolve()?;
    let packages = guess_bare_imports(&root, &config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    for name in &packages {
        println!("{}", name);
    }

    eprintln!(
        "{}",
        format!(
            "Found {} package(s) under {}",
            packages.len(),
            root.display()
        )
        .bright_black()
    );

    Ok(())
}
