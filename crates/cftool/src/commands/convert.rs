//! `cftool convert`: rewrite short-form tags into canonical keys.

use anyhow::{Result, bail};
use cftool_intrinsics::{Document, TagCatalog};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::report::ConvertResult;
use crate::utils::file_io::{read_file, write_file};
use crate::utils::glob_expand::expand_globs;

#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub files: Vec<String>,
    pub in_place: bool,
    /// Report what would change without writing anything
    pub check: bool,
    pub output: Option<PathBuf>,
}

/// Rewrite `content`, returning the new text and how many lines changed.
pub fn convert_content(content: &str, catalog: &TagCatalog) -> (String, usize) {
    let mut document = Document::from_text(content);
    let lines_changed = document.rewrite(catalog);
    (document.to_text(), lines_changed)
}

pub fn convert_file(path: &Path, args: &ConvertArgs, catalog: &TagCatalog) -> Result<ConvertResult> {
    let content = read_file(path)?;
    let (converted, lines_changed) = convert_content(&content, catalog);
    let file_path = path.display().to_string();
    tracing::debug!(file = %file_path, lines_changed, "Converted");

    let mut result = ConvertResult {
        file_path,
        lines_changed,
        written_to: None,
        converted: None,
    };

    if args.check {
        return Ok(result);
    }

    if args.in_place {
        // Leave untouched files alone so their timestamps stay put.
        if lines_changed > 0 {
            write_file(path, &converted)?;
            result.written_to = Some(result.file_path.clone());
        }
    } else if let Some(output) = &args.output {
        write_file(output, &converted)?;
        result.written_to = Some(output.display().to_string());
    } else {
        result.converted = Some(converted);
    }

    Ok(result)
}

/// Returns `true` unless `--check` found a file that would change.
pub fn execute(args: &ConvertArgs) -> Result<bool> {
    if args.in_place && args.output.is_some() {
        bail!("--in-place and --output cannot be used together");
    }

    let file_paths = expand_globs(&args.files)?;
    if args.output.is_some() && file_paths.len() != 1 {
        bail!(
            "--output takes exactly one input file, got {}",
            file_paths.len()
        );
    }

    let catalog = TagCatalog::standard();
    let mut clean = true;

    for file_path in &file_paths {
        tracing::info!(file = %file_path.display(), "Converting");
        let result = convert_file(file_path, args, catalog)?;

        if args.check {
            if result.lines_changed > 0 {
                clean = false;
                println!(
                    "  {} {} - {} line(s) would change",
                    "✗".red(),
                    result.file_path,
                    result.lines_changed
                );
            } else {
                println!("  {} {}", "✓".green(), result.file_path);
            }
        } else if let Some(converted) = result.converted {
            print!("{}", converted);
        } else if let Some(written_to) = &result.written_to {
            println!(
                "  {} {} - {} line(s) rewritten",
                "✓".green(),
                written_to,
                result.lines_changed
            );
        }
    }

    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "Resources:\n  Topic:\n    Type: AWS::SNS::Topic\n    Properties:\n      TopicName: !Sub ${AWS::StackName}-alerts\n";

    fn args(path: &Path) -> ConvertArgs {
        ConvertArgs {
            files: vec![path.display().to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_content_counts_changed_lines() {
        let (converted, changed) = convert_content(TEMPLATE, TagCatalog::standard());
        assert_eq!(changed, 1);
        assert!(converted.contains("TopicName: \"Fn::Sub\": \"${AWS::StackName}-alerts\"\n"));
    }

    #[test]
    fn test_stdout_mode_keeps_converted_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, TEMPLATE).unwrap();

        let result = convert_file(&path, &args(&path), TagCatalog::standard()).unwrap();
        assert!(result.converted.unwrap().contains("\"Fn::Sub\":"));
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_check_mode_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, TEMPLATE).unwrap();

        let mut check = args(&path);
        check.check = true;
        check.in_place = true;
        let result = convert_file(&path, &check, TagCatalog::standard()).unwrap();
        assert_eq!(result.lines_changed, 1);
        assert!(result.converted.is_none());
        assert!(result.written_to.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_in_place_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, TEMPLATE).unwrap();

        let mut in_place = args(&path);
        in_place.in_place = true;
        let result = convert_file(&path, &in_place, TagCatalog::standard()).unwrap();
        assert_eq!(result.written_to.as_deref(), Some(result.file_path.as_str()));
        assert!(!fs::read_to_string(&path).unwrap().contains("!Sub"));
    }

    #[test]
    fn test_output_requires_single_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.yaml");
        let b = dir.path().join("b.yaml");
        fs::write(&a, TEMPLATE).unwrap();
        fs::write(&b, TEMPLATE).unwrap();

        let err = execute(&ConvertArgs {
            files: vec![a.display().to_string(), b.display().to_string()],
            output: Some(dir.path().join("out.yaml")),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("exactly one input file"));
    }
}
