pub mod builtins;
pub mod classify;
pub mod extract;
pub mod language;
pub mod query;
pub mod walker;

pub use classify::{canonical_name, classify, PackageNameSet};
pub use extract::{extract_imports, query_imports, ExtractError, ExtractionResult, SourceFile};
pub use language::SourceLanguage;
pub use walker::{collect_raw_imports, guess_bare_imports, guess_project, walk, ScanError};
