use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Whether `pattern` should go through glob expansion rather than be taken
/// as a literal path.
fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand glob patterns into a list of template paths.
///
/// Literal paths must exist. A pattern that matches nothing only warns, so
/// `cftool check templates/*.yaml` on an empty directory is not an error.
/// Duplicates (a file named both literally and by a glob) are dropped,
/// keeping the first position.
pub fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        if is_glob(pattern) {
            let paths = glob::glob(pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

            let mut match_count = 0;
            for path in paths {
                let path =
                    path.with_context(|| format!("Failed to read glob match for: {}", pattern))?;
                match_count += 1;
                if path.is_file() && !files.contains(&path) {
                    files.push(path);
                }
            }

            if match_count == 0 {
                tracing::warn!(%pattern, "No files matched pattern");
            }
        } else {
            let path = PathBuf::from(pattern);
            if !path.exists() {
                bail!("File not found: {}", pattern);
            }
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}
