//! Tree walking and task scheduling
//!
//! The walk itself is synchronous. Each eligible file is handed to its own
//! tokio task as soon as it is found, and every task reports exactly one
//! [`ExtractionResult`] back over a shared channel. The collector knows how
//! many tasks were dispatched and receives exactly that many results.

use crate::config::{ConfigError, ScanConfig};
use crate::guess::classify::{classify, PackageNameSet};
use crate::guess::extract::{parse_file, ExtractError, ExtractionResult, SourceFile};
use crate::guess::language::SourceLanguage;
use crate::guess::query::imports_query;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tree_sitter::Query;
use walkdir::WalkDir;

/// Scan-level failure
///
/// Per-file problems never show up here; they are logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to enumerate directory: {0}")]
    Enumerate(#[from] walkdir::Error),

    #[error("invalid {language} import query: {message}")]
    Query {
        language: SourceLanguage,
        message: String,
    },

    #[error("cannot scan '{}': {source}", path.display())]
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("scan root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("only {received} of {expected} files reported a result")]
    Incomplete { expected: usize, received: usize },
}

/// Compiled import queries for every grammar
#[derive(Clone, Copy)]
struct ImportQueries {
    javascript: &'static Query,
    typescript: &'static Query,
    tsx: &'static Query,
}

impl ImportQueries {
    fn load() -> Result<Self, ScanError> {
        let load = |language: SourceLanguage| {
            imports_query(language).map_err(|e| ScanError::Query {
                language,
                message: e.to_string(),
            })
        };

        Ok(Self {
            javascript: load(SourceLanguage::JavaScript)?,
            typescript: load(SourceLanguage::TypeScript)?,
            tsx: load(SourceLanguage::Tsx)?,
        })
    }

    fn get(&self, language: SourceLanguage) -> &'static Query {
        match language {
            SourceLanguage::JavaScript => self.javascript,
            SourceLanguage::TypeScript => self.typescript,
            SourceLanguage::Tsx => self.tsx,
        }
    }
}

/// Walk `root`, handing every eligible source file to `dispatch`
///
/// Directories whose base name is ignored (the root included) are pruned
/// before they are read. Files with an unrecognized extension are never
/// opened. Returns how many files were dispatched.
///
/// # Errors
/// Any directory that cannot be listed aborts the walk.
pub fn walk<F>(
    root: &Path,
    is_ignored: &dyn Fn(&str) -> bool,
    mut dispatch: F,
) -> Result<usize, ScanError>
where
    F: FnMut(SourceFile),
{
    let mut dispatched = 0;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir() && is_ignored(&entry.file_name().to_string_lossy()))
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        if let Some(file) = SourceFile::from_path(entry.into_path()) {
            dispatched += 1;
            dispatch(file);
        }
    }

    Ok(dispatched)
}

/// Guess the external packages imported anywhere under `root`
pub async fn guess_bare_imports(
    root: &Path,
    config: &ScanConfig,
) -> Result<PackageNameSet, ScanError> {
    let import_paths = collect_raw_imports(root, config).await?;
    Ok(classify(import_paths))
}

/// Guess the packages under `root` using its own `depguess.toml`, if any
pub async fn guess_project(root: &Path) -> Result<PackageNameSet, ScanError> {
    let config = ScanConfig::discover(root)?;
    guess_bare_imports(root, &config).await
}

/// Collect raw import paths from every eligible file under `root`
///
/// Paths come back unclassified, grouped per file in completion order.
pub async fn collect_raw_imports(
    root: &Path,
    config: &ScanConfig,
) -> Result<Vec<String>, ScanError> {
    let root = std::fs::canonicalize(root).map_err(|source| ScanError::InvalidRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    let queries = ImportQueries::load()?;
    let limiter = Arc::new(Semaphore::new(config.max_concurrency()));
    let timeout = config.task_timeout();
    let (tx, mut rx) = mpsc::unbounded_channel::<ExtractionResult>();

    let is_ignored = |name: &str| config.is_ignored_directory(name);
    let dispatched = walk(&root, &is_ignored, |file| {
        let query = queries.get(file.language);
        let results = tx.clone();
        let limiter = Arc::clone(&limiter);

        tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await.ok();
            let path = file.path.clone();
            let result = supervise(path, move || parse_file(file, query), timeout).await;
            // The receiver only goes away if the scan itself was abandoned
            let _ = results.send(result);
        });
    })?;
    drop(tx);

    tracing::debug!("Dispatched {} files under {}", dispatched, root.display());

    collect_results(&mut rx, dispatched).await
}

/// Receive exactly `dispatched` results and keep the successful ones
///
/// A channel that closes short of the count means a task vanished without
/// reporting, so the partial result is not trusted.
async fn collect_results(
    rx: &mut mpsc::UnboundedReceiver<ExtractionResult>,
    dispatched: usize,
) -> Result<Vec<String>, ScanError> {
    let mut import_paths = Vec::new();
    let mut failed = 0;

    for received in 0..dispatched {
        let Some(result) = rx.recv().await else {
            return Err(ScanError::Incomplete {
                expected: dispatched,
                received,
            });
        };

        if !result.ok {
            failed += 1;
            continue;
        }
        import_paths.extend(result.import_paths);
    }

    if failed > 0 {
        tracing::info!("{} of {} files could not be scanned", failed, dispatched);
    }

    Ok(import_paths)
}

/// Run one extraction job on the blocking pool
///
/// Turns a timeout or a panic into a failed result so that the collector
/// always gets exactly one result per task.
async fn supervise<F>(path: PathBuf, job: F, timeout: Option<Duration>) -> ExtractionResult
where
    F: FnOnce() -> ExtractionResult + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                report_failure(&path, &ExtractError::Timeout(limit));
                return ExtractionResult::failed(path);
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|_| {
        report_failure(&path, &ExtractError::Panicked);
        ExtractionResult::failed(path)
    })
}

fn report_failure(path: &Path, err: &ExtractError) {
    tracing::warn!("failed to guess imports from {}: {}", path.display(), err);
}
