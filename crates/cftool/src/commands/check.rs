//! `cftool check`: report tags still written in short form.

use anyhow::Result;
use cftool_intrinsics::TagCatalog;
use cftool_intrinsics::rewriter::is_escaped;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::report::{CheckResult, FindingKind, SourceLocation, print_check_summary};
use crate::utils::file_io::{read_file, write_file};
use crate::utils::glob_expand::expand_globs;

/// A sigil followed by a mnemonic. `_` continues a mnemonic, matching how
/// the rewriter decides token boundaries.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!([A-Za-z][A-Za-z0-9_]*)").expect("tag pattern is valid"));

#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub files: Vec<String>,
    pub json: bool,
    /// Also save the JSONL records here
    pub output: Option<PathBuf>,
}

/// An unknown tag only starts after whitespace or a flow-collection
/// delimiter, so `Hello!World` in a plain scalar and YAML core tags
/// (`!!str`) are not reported.
fn starts_tag(line: &str, offset: usize) -> bool {
    match line[..offset].chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '[' | '{' | ','),
    }
}

fn location(line: &str, index: usize, offset: usize) -> SourceLocation {
    SourceLocation {
        row: index + 1,
        column: line[..offset].chars().count() + 1,
    }
}

/// Find every tag in `content`.
///
/// Cataloged tags are located exactly as the rewriter locates them, so a
/// line reported here is a line `convert` changes. Other `!Name` tags are
/// reported as unknown.
pub fn scan(content: &str, file_path: &str, catalog: &TagCatalog) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if is_escaped(line) {
            continue;
        }

        let mut found: Vec<(usize, CheckResult)> = Vec::new();

        for definition in catalog.iter() {
            for offset in definition.short_form_offsets(line) {
                let location = location(line, index, offset);
                found.push((
                    offset,
                    CheckResult {
                        kind: FindingKind::ShortForm,
                        file_path: file_path.to_string(),
                        tag: definition.short_form.clone(),
                        canonical: Some(definition.long_form.clone()),
                        message: format!(
                            "{}:{}:{}: {} can be written as {}",
                            file_path,
                            location.row,
                            location.column,
                            definition.short_form,
                            definition.key_form()
                        ),
                        location,
                    },
                ));
            }
        }

        for captures in TAG_PATTERN.captures_iter(line) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if catalog.get(name.as_str()).is_some() || !starts_tag(line, whole.start()) {
                continue;
            }

            let location = location(line, index, whole.start());
            found.push((
                whole.start(),
                CheckResult {
                    kind: FindingKind::UnknownTag,
                    file_path: file_path.to_string(),
                    tag: whole.as_str().to_string(),
                    canonical: None,
                    message: format!(
                        "{}:{}:{}: {} is not an intrinsic function and will be left as is",
                        file_path,
                        location.row,
                        location.column,
                        whole.as_str()
                    ),
                    location,
                },
            ));
        }

        found.sort_by_key(|(offset, _)| *offset);
        results.extend(found.into_iter().map(|(_, result)| result));
    }

    results
}

/// Returns `true` when no short-form tag remains in any file.
pub fn execute(args: &CheckArgs) -> Result<bool> {
    let file_paths = expand_globs(&args.files)?;
    let catalog = TagCatalog::standard();
    let mut all_results = Vec::new();

    for file_path in &file_paths {
        tracing::info!(file = %file_path.display(), "Checking");
        let content = read_file(file_path)?;
        let results = scan(&content, &file_path.display().to_string(), catalog);

        if !args.json {
            for result in &results {
                if result.kind.is_issue() {
                    println!("  {} {}", "✗".red(), result.message);
                } else {
                    println!("  {} {}", "?".yellow(), result.message);
                }
            }
        }
        all_results.extend(results);
    }

    if args.json {
        for result in &all_results {
            println!("{}", serde_json::to_string(result)?);
        }
    } else {
        print_check_summary(file_paths.len(), &all_results);
    }

    if let Some(output_path) = &args.output {
        let mut output_str = String::new();
        for result in &all_results {
            output_str.push_str(&serde_json::to_string(result)?);
            output_str.push('\n');
        }
        write_file(output_path, &output_str)?;
    }

    Ok(!all_results.iter().any(|result| result.kind.is_issue()))
}
