//! Result records shared by the commands, serialized one per line with
//! `--json`.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 1-indexed position of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A catalog tag still written in short form
    ShortForm,
    /// A `!Name` tag the catalog does not know; it will pass through unchanged
    UnknownTag,
}

impl FindingKind {
    /// Whether the finding fails `cftool check`.
    pub fn is_issue(&self) -> bool {
        matches!(self, FindingKind::ShortForm)
    }
}

/// One tag occurrence found by `cftool check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub kind: FindingKind,
    pub file_path: String,
    /// Tag as written, e.g. `!Sub`
    pub tag: String,
    /// Canonical key the tag converts to, e.g. `Fn::Sub`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub message: String,
    pub location: SourceLocation,
}

/// Outcome of converting one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    pub file_path: String,
    pub lines_changed: usize,
    /// Where the converted text went, when not stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
    /// Converted text, kept when it is meant for stdout
    #[serde(skip)]
    pub converted: Option<String>,
}

pub fn print_check_summary(total_files: usize, results: &[CheckResult]) {
    let mut files_with_issues = BTreeSet::new();
    let mut by_tag: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unknown = 0;

    for result in results {
        if result.kind.is_issue() {
            files_with_issues.insert(result.file_path.as_str());
            *by_tag.entry(result.tag.as_str()).or_insert(0) += 1;
        } else {
            unknown += 1;
        }
    }

    let files_with_issues_count = files_with_issues.len();
    let files_clean = total_files.saturating_sub(files_with_issues_count);
    let total_issues: usize = by_tag.values().sum();

    println!("\n{}", "=== Summary ===".bold());
    println!("Total files:         {}", total_files);
    println!(
        "Files with issues:   {} {}",
        files_with_issues_count,
        if files_with_issues_count > 0 {
            "✗".red()
        } else {
            "✓".green()
        }
    );
    println!("Clean files:         {} {}", files_clean, "✓".green());

    if !by_tag.is_empty() {
        println!("\n{}", "Short forms by tag:".bold());
        for (tag, count) in &by_tag {
            println!("  {}: {}", tag.cyan(), count);
        }
    }

    println!("\nTotal short forms:   {}", total_issues);
    if unknown > 0 {
        println!("Unknown tags:        {} (left unchanged)", unknown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_jsonl_shape() {
        let result = CheckResult {
            kind: FindingKind::ShortForm,
            file_path: "stack.yaml".into(),
            tag: "!Ref".into(),
            canonical: Some("Ref".into()),
            message: "stack.yaml:3:12: !Ref can be written as \"Ref\":".into(),
            location: SourceLocation { row: 3, column: 12 },
        };
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "short-form");
        assert_eq!(json["canonical"], "Ref");
        assert_eq!(json["location"]["row"], 3);
        assert_eq!(json["location"]["column"], 12);
    }

    #[test]
    fn test_unknown_tag_omits_canonical() {
        let result = CheckResult {
            kind: FindingKind::UnknownTag,
            file_path: "stack.yaml".into(),
            tag: "!Custom".into(),
            canonical: None,
            message: String::new(),
            location: SourceLocation { row: 1, column: 1 },
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("canonical"));
        assert!(json.contains(r#""kind":"unknown-tag""#));
        assert!(!FindingKind::UnknownTag.is_issue());
    }
}
