//! Imports CLI command
//!
//! Prints the raw import paths found in a tree, before any filtering.

use crate::cli::ScanArgs;
use crate::guess::collect_raw_imports;
use crate::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ImportsArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Sort and deduplicate the output
    #[arg(short, long)]
    pub unique: bool,
}

pub async fn run(args: ImportsArgs) -> Result<()> {
    let (root, config) = args.scan.resolve()?;
    let mut import_paths = collect_raw_imports(&root, &config).await?;

    if args.unique {
        import_paths.sort();
        import_paths.dedup();
    }

    for path in import_paths {
        println!("{}", path);
    }

    Ok(())
}
