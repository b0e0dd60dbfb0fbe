//! `cftool list-tags`: print the tag catalog.

use cftool_intrinsics::TagCatalog;
use colored::Colorize;

/// One `short -> long` line per catalog entry, in catalog order.
pub fn catalog_lines(catalog: &TagCatalog) -> Vec<String> {
    let width = catalog
        .iter()
        .map(|tag| tag.short_form.len())
        .max()
        .unwrap_or(0);
    catalog
        .iter()
        .map(|tag| format!("{:<width$} -> {}", tag.short_form, tag.long_form))
        .collect()
}

pub fn execute() {
    println!("{}", "Intrinsic function tags:".bold());
    for line in catalog_lines(TagCatalog::standard()) {
        println!("  {}", line.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_aligned() {
        let catalog = TagCatalog::from_names(&["Ref", "GetAtt", "Sub"]);
        assert_eq!(
            catalog_lines(&catalog),
            vec!["!Ref    -> Ref", "!GetAtt -> Fn::GetAtt", "!Sub    -> Fn::Sub"]
        );
    }

    #[test]
    fn test_standard_catalog_listed() {
        let lines = catalog_lines(TagCatalog::standard());
        assert_eq!(lines.len(), TagCatalog::standard().len());
        assert!(lines.iter().any(|line| line.starts_with("!ImportValue -> Fn::ImportValue")));
    }
}
