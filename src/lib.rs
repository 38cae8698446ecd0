// depguess - guess a JavaScript/TypeScript project's npm dependencies
// Parses every source file with tree-sitter and collects what it imports

pub mod cli;
pub mod config;
pub mod guess;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use config::ScanConfig;
pub use guess::{guess_bare_imports, PackageNameSet, ScanError};
