use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Read a template to a string, dropping a leading byte order mark.
///
/// Editors on some platforms save templates with a BOM, which would
/// otherwise end up glued to the first key.
pub fn read_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    match content.strip_prefix(BYTE_ORDER_MARK) {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

/// Write content to a file, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, "\u{feff}Resources: {}\n").unwrap();

        assert_eq!(read_file(&path).unwrap(), "Resources: {}\n");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("nested").join("stack.yaml");

        write_file(&path, "Resources: {}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Resources: {}\n");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = read_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.yaml"));
    }
}
