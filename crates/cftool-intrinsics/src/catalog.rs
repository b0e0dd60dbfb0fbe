//! Catalog of recognized intrinsic function tags.
//!
//! Each entry maps a mnemonic (like `Sub`) to the three spellings the
//! rewriter needs:
//!
//! - short form: `!Sub`, the tag as written in YAML templates
//! - long form: `Fn::Sub`, the canonical key
//! - full form: `"Fn::Sub"`, the quoted long form used as a bare scalar
//!
//! `Ref` and `Condition` are their own canonical keys and carry no `Fn::`
//! namespace.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Sigil introducing a short-form tag.
pub const SIGIL: char = '!';

/// A line containing this marker treats every sigil as literal text.
pub const ESCAPE_MARKER: &str = "#!";

/// Namespace shared by every canonical function key.
pub const CANONICAL_PREFIX: &str = "Fn::";

/// Mnemonics in rewrite order.
///
/// Functions that usually wrap others come first, so that by the time an
/// inner tag is rewritten its enclosing tag already carries the canonical
/// prefix and the nesting detector can see it.
const STANDARD_NAMES: &[&str] = &[
    "And",
    "Or",
    "Not",
    "Equals",
    "If",
    "Base64",
    "Cidr",
    "FindInMap",
    "Join",
    "Select",
    "Split",
    "ImportValue",
    "Transform",
    "Sub",
    "GetAZs",
    "GetAtt",
    "Condition",
    "Ref",
];

/// Mnemonics whose canonical key has no `Fn::` namespace.
const UNPREFIXED_NAMES: &[&str] = &["Ref", "Condition"];

/// The three spellings of one intrinsic function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    /// Bare mnemonic, e.g. `GetAtt`
    pub name: String,

    /// Sigil plus mnemonic, e.g. `!GetAtt`
    pub short_form: String,

    /// Canonical key, e.g. `Fn::GetAtt`
    pub long_form: String,

    /// Quoted canonical key, e.g. `"Fn::GetAtt"`
    pub full_form: String,
}

impl TagDefinition {
    /// Derive every form from a mnemonic.
    pub fn new(name: &str) -> Self {
        let long_form = if UNPREFIXED_NAMES.contains(&name) {
            name.to_string()
        } else {
            format!("{}{}", CANONICAL_PREFIX, name)
        };

        Self {
            name: name.to_string(),
            short_form: format!("{}{}", SIGIL, name),
            full_form: format!("\"{}\"", long_form),
            long_form,
        }
    }

    /// Replacement used when the tag introduces a nested value: `"Fn::Sub":`
    pub fn key_form(&self) -> String {
        format!("{}:", self.full_form)
    }

    /// Whether this is the string substitution function.
    pub fn is_substitution(&self) -> bool {
        self.name == "Sub"
    }

    /// Byte offsets of every short-form occurrence in `line`.
    ///
    /// An occurrence only counts when the mnemonic ends there: `!Ref` is not
    /// found inside `!Reference`.
    pub fn short_form_offsets(&self, line: &str) -> Vec<usize> {
        line.match_indices(self.short_form.as_str())
            .map(|(offset, _)| offset)
            .filter(|&offset| ends_at_boundary(line, offset + self.short_form.len()))
            .collect()
    }
}

/// True when the character at `end` cannot continue a mnemonic.
pub(crate) fn ends_at_boundary(line: &str, end: usize) -> bool {
    match line[end..].chars().next() {
        Some(c) => !(c.is_alphanumeric() || c == '_'),
        None => true,
    }
}

/// Ordered, immutable set of tag definitions with lookup by mnemonic.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    entries: Vec<TagDefinition>,
    by_name: HashMap<String, usize>,
}

static STANDARD_CATALOG: Lazy<TagCatalog> = Lazy::new(|| TagCatalog::from_names(STANDARD_NAMES));

impl TagCatalog {
    /// The catalog of template intrinsic functions.
    pub fn standard() -> &'static TagCatalog {
        &STANDARD_CATALOG
    }

    /// Build a catalog from mnemonics. Order is rewrite order; duplicates
    /// keep their first position.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut entries = Vec::with_capacity(names.len());
        let mut by_name = HashMap::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            if by_name.contains_key(name) {
                continue;
            }
            by_name.insert(name.to_string(), entries.len());
            entries.push(TagDefinition::new(name));
        }

        Self { entries, by_name }
    }

    /// Look up a tag by mnemonic (without the sigil).
    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Look up a tag by its short form, e.g. `!Sub`.
    pub fn get_short(&self, short_form: &str) -> Option<&TagDefinition> {
        short_form.strip_prefix(SIGIL).and_then(|name| self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
