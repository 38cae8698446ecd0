//! Import extraction for a single source file
//!
//! Reads the file, parses it with the grammar for its extension and runs the
//! language's import query over the tree. Only the `@import` capture is used.

use crate::guess::language::SourceLanguage;
use crate::guess::query::{imports_query, IMPORT_CAPTURE};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// A source file discovered by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

impl SourceFile {
    /// Build a source file from a path, if its extension is recognized
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let language = SourceLanguage::from_path(&path)?;
        Some(Self { path, language })
    }
}

/// Outcome of extracting one file
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub path: PathBuf,
    pub import_paths: Vec<String>,
    pub ok: bool,
}

impl ExtractionResult {
    pub fn failed(path: PathBuf) -> Self {
        Self {
            path,
            import_paths: Vec::new(),
            ok: false,
        }
    }
}

/// Per-file extraction failure
///
/// None of these abort a scan; the file simply contributes nothing.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("incompatible grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("failed to parse file")]
    Parse,

    /// A match had captures but none named `import`
    #[error("empty import path")]
    EmptyImportPath,

    #[error("invalid {0} import query")]
    Query(SourceLanguage),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("extraction task panicked")]
    Panicked,
}

/// Read `path` and return the raw import paths found in it, in source order
pub fn query_imports(
    path: &Path,
    language: SourceLanguage,
    query: &Query,
) -> Result<Vec<String>, ExtractError> {
    let contents = fs::read_to_string(path)?;
    imports_in_source(&contents, language, query)
}

/// Read a discovered file with the import query for its language
pub fn extract_imports(file: &SourceFile) -> Result<Vec<String>, ExtractError> {
    let query = imports_query(file.language).map_err(|_| ExtractError::Query(file.language))?;
    query_imports(&file.path, file.language, query)
}

/// Run the import query over already-loaded source text
pub fn imports_in_source(
    source: &str,
    language: SourceLanguage,
    query: &Query,
) -> Result<Vec<String>, ExtractError> {
    let mut parser = Parser::new();
    parser.set_language(&language.tree_sitter_language())?;

    let tree = parser.parse(source, None).ok_or(ExtractError::Parse)?;
    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!("{} tree contains syntax errors, querying anyway", language);
    }

    let import_index = query.capture_index_for_name(IMPORT_CAPTURE);
    let mut import_paths = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source.as_bytes());

    while let Some(m) = matches.next() {
        if m.captures.is_empty() {
            continue;
        }

        let capture = m
            .captures
            .iter()
            .find(|c| Some(c.index) == import_index)
            .ok_or(ExtractError::EmptyImportPath)?;

        let text = &source[capture.node.byte_range()];
        import_paths.push(trim_quotes(text).to_string());
    }

    Ok(import_paths)
}

/// Extract one file, logging any failure
///
/// This is the body of a scan task: it never fails, a broken file yields a
/// result with `ok == false`.
pub fn parse_file(file: SourceFile, query: &Query) -> ExtractionResult {
    match query_imports(&file.path, file.language, query) {
        Ok(import_paths) => ExtractionResult {
            path: file.path,
            import_paths,
            ok: true,
        },
        Err(err) => {
            tracing::warn!(
                "failed to guess imports from {}: {}",
                file.path.display(),
                err
            );
            ExtractionResult::failed(file.path)
        }
    }
}

/// Strip one layer of surrounding quote characters
fn trim_quotes(text: &str) -> &str {
    let is_quote = |c: char| matches!(c, '\'' | '"' | '`');
    let text = text.strip_prefix(is_quote).unwrap_or(text);
    text.strip_suffix(is_quote).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn js(source: &str) -> Vec<String> {
        let query = imports_query(SourceLanguage::JavaScript).unwrap();
        imports_in_source(source, SourceLanguage::JavaScript, query).unwrap()
    }

    #[test]
    fn test_trim_quotes() {
        assert_eq!(trim_quotes("\"react\""), "react");
        assert_eq!(trim_quotes("'react'"), "react");
        assert_eq!(trim_quotes("`react`"), "react");
        assert_eq!(trim_quotes("\"\"\"x\"\"\""), "\"\"x\"\"");
        assert_eq!(trim_quotes("\"\""), "");
        assert_eq!(trim_quotes("plain"), "plain");
    }

    #[test]
    fn test_import_statements() {
        let imports = js(r#"
import React from 'react';
import { useState } from "react";
import * as path from 'node:path';
import './styles.css';
"#);
        assert_eq!(
            imports,
            vec!["react", "react", "node:path", "./styles.css"]
        );
    }

    #[test]
    fn test_require_and_dynamic_import() {
        let imports = js(r#"
const express = require("express");
const lazy = import("chart.js");
const notRequire = load("ignored");
const twoArgs = require("a", "b");
const nested = foo(require('lodash/debounce'));
"#);
        assert_eq!(imports, vec!["express", "chart.js", "lodash/debounce"]);
    }

    #[test]
    fn test_export_from() {
        let imports = js(r#"
export { default } from "@org/button";
export * from './local';
export const answer = 42;
"#);
        assert_eq!(imports, vec!["@org/button", "./local"]);
    }

    #[test]
    fn test_template_literal_require_is_ignored() {
        let imports = js("const x = require(`dyn-${name}`);\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_typescript_forms() {
        let query = imports_query(SourceLanguage::TypeScript).unwrap();
        let imports = imports_in_source(
            r#"
import type { Foo } from "foo-types";
import fs = require("fs-extra");
const x: number = require("yargs");
"#,
            SourceLanguage::TypeScript,
            query,
        )
        .unwrap();
        assert_eq!(imports, vec!["foo-types", "fs-extra", "yargs"]);
    }

    #[test]
    fn test_exported_import_require_does_not_hide_neighbours() {
        // `export import k = require(..)` itself is not recognized
        let query = imports_query(SourceLanguage::TypeScript).unwrap();
        let imports = imports_in_source(
            r#"
import i = require("i");
import j from "j";
export import k = require("k2");
const l = require("l");
"#,
            SourceLanguage::TypeScript,
            query,
        )
        .unwrap();
        for expected in ["i", "j", "l"] {
            assert!(imports.iter().any(|p| p == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_tsx() {
        let query = imports_query(SourceLanguage::Tsx).unwrap();
        let imports = imports_in_source(
            r#"
import React from "react";
export const App = (): JSX.Element => <div>{require("classnames")}</div>;
"#,
            SourceLanguage::Tsx,
            query,
        )
        .unwrap();
        assert_eq!(imports, vec!["react", "classnames"]);
    }

    #[test]
    fn test_syntax_errors_still_yield_imports() {
        let imports = js("import left from 'left-pad';\nfunction (((\n");
        assert_eq!(imports, vec!["left-pad"]);
    }

    #[test]
    fn test_query_imports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let query = imports_query(SourceLanguage::JavaScript).unwrap();
        let result = query_imports(
            &temp_dir.path().join("missing.js"),
            SourceLanguage::JavaScript,
            query,
        );
        assert!(matches!(result, Err(ExtractError::Read(_))));
    }

    #[test]
    fn test_extract_imports_picks_query_by_language() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.ts");
        fs::write(&path, "import cp = require('cross-spawn');\nimport 'dotenv/config';").unwrap();

        let file = SourceFile::from_path(path).unwrap();
        assert_eq!(file.language, SourceLanguage::TypeScript);
        assert_eq!(
            extract_imports(&file).unwrap(),
            vec!["cross-spawn", "dotenv/config"]
        );

        let missing = SourceFile::from_path(temp_dir.path().join("gone.js")).unwrap();
        assert!(matches!(extract_imports(&missing), Err(ExtractError::Read(_))));
    }

    #[test]
    fn test_parse_file_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.js");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let query = imports_query(SourceLanguage::JavaScript).unwrap();
        let file = SourceFile::from_path(path.clone()).unwrap();
        let result = parse_file(file, query);
        assert!(!result.ok);
        assert!(result.import_paths.is_empty());
        assert_eq!(result.path, path);
    }

    #[test]
    fn test_captures_without_import_fail_loudly() {
        let language = SourceLanguage::JavaScript;
        let query = Query::new(
            &language.tree_sitter_language(),
            "(import_statement source: (string) @source)",
        )
        .unwrap();
        let result = imports_in_source("import x from 'x';", language, &query);
        assert!(matches!(result, Err(ExtractError::EmptyImportPath)));
    }

    #[test]
    fn test_matches_without_captures_are_skipped() {
        let language = SourceLanguage::JavaScript;
        let query = Query::new(&language.tree_sitter_language(), "(import_statement)").unwrap();
        let result = imports_in_source("import x from 'x';", language, &query).unwrap();
        assert!(result.is_empty());
    }
}
