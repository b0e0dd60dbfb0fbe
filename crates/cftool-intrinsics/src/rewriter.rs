//! Single-line rewriting of short-form tags.
//!
//! [`rewrite_step`] replaces one occurrence of one tag and is the unit every
//! other function here repeats. [`rewrite_tag`] drives it until the tag is
//! gone from the line, and [`rewrite_line`] does that for every tag in a
//! catalog.

use std::ops::Range;

use crate::catalog::{ESCAPE_MARKER, SIGIL, TagCatalog, TagDefinition};
use crate::nesting::{Branch, LineContext, PIPE_MARKER, key_replacement};
use crate::quoting::quote_substitution_argument;

/// Which spelling of the tag a variant looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Short,
    Full,
}

/// One entry of the ordered replacement list: an anchor, optionally followed
/// by a pipe marker that is consumed along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Variant {
    anchor: Anchor,
    piped: bool,
}

impl Variant {
    const fn new(anchor: Anchor, piped: bool) -> Self {
        Self { anchor, piped }
    }

    /// Byte range this variant would replace, if it matches.
    fn locate(&self, line: &str, tag: &TagDefinition) -> Option<Range<usize>> {
        let candidates: Vec<Range<usize>> = match self.anchor {
            Anchor::Short => tag
                .short_form_offsets(line)
                .into_iter()
                .map(|start| start..start + tag.short_form.len())
                .collect(),
            // A full form followed by a colon is already a key.
            Anchor::Full => line
                .match_indices(tag.full_form.as_str())
                .map(|(start, found)| start..start + found.len())
                .filter(|range| !line[range.end..].starts_with(':'))
                .collect(),
        };

        candidates.into_iter().find_map(|range| {
            match (self.piped, pipe_suffix_len(&line[range.end..])) {
                (true, Some(len)) => Some(range.start..range.end + len),
                (false, None) => Some(range),
                _ => None,
            }
        })
    }
}

/// Bare sequence items only ever hold the short form.
const BARE_VARIANTS: [Variant; 2] = [
    Variant::new(Anchor::Short, false),
    Variant::new(Anchor::Short, true),
];

const KEY_VARIANTS: [Variant; 4] = [
    Variant::new(Anchor::Short, false),
    Variant::new(Anchor::Short, true),
    Variant::new(Anchor::Full, false),
    Variant::new(Anchor::Full, true),
];

/// Length of ` |` plus an optional chomping indicator at the start of `rest`.
fn pipe_suffix_len(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix(' ')?.strip_prefix(PIPE_MARKER)?;
    let chomp = usize::from(after.starts_with('-') || after.starts_with('+'));
    Some(2 + chomp)
}

/// Replace the first matching variant's range with `replacement`.
fn apply_first(variants: &[Variant], line: &str, tag: &TagDefinition, replacement: &str) -> Option<String> {
    let range = variants.iter().find_map(|variant| variant.locate(line, tag))?;

    let mut out = String::with_capacity(line.len() + replacement.len());
    out.push_str(&line[..range.start]);
    out.push_str(replacement);
    out.push_str(&line[range.end..]);
    Some(out)
}

/// Whether every sigil on the line is literal text.
///
/// Comment lines count as escaped too.
pub fn is_escaped(line: &str) -> bool {
    line.contains(ESCAPE_MARKER) || line.trim_start().starts_with('#')
}

/// Number of sigil characters on a line.
pub fn sigil_count(line: &str) -> usize {
    line.matches(SIGIL).count()
}

/// Rewrite one occurrence of `tag` on `line`.
///
/// Returns `None` when nothing applies: the line is escaped, the tag is not
/// on it, or the surrounding text does not fit any replacement variant.
pub fn rewrite_step(line: &str, next_line: Option<&str>, tag: &TagDefinition) -> Option<String> {
    let bare = LineContext::new(line, next_line, tag).branch() == Branch::BareSequenceItem;
    step_in_form(line, next_line, tag, bare)
}

/// One step with the bare-or-key decision already made for the line.
///
/// Nesting and quoting are still read from the current text, since an
/// earlier replacement can put a canonical key in front of the occurrence.
fn step_in_form(line: &str, next_line: Option<&str>, tag: &TagDefinition, bare: bool) -> Option<String> {
    if is_escaped(line) || !line.contains(tag.name.as_str()) {
        return None;
    }

    let context = LineContext::new(line, next_line, tag);
    let branch = if bare {
        Branch::BareSequenceItem
    } else {
        context.mapping_branch()
    };

    let rewritten = match branch {
        Branch::BareSequenceItem => apply_first(&BARE_VARIANTS, line, tag, &tag.full_form),
        Branch::MappingValue { nested } => {
            let quoted = quote_substitution_argument(line, tag, &context);
            let line = quoted.as_deref().unwrap_or(line);
            let replacement = key_replacement(tag, nested, context.indent);
            apply_first(&KEY_VARIANTS, line, tag, &replacement)
        }
    }?;

    tracing::debug!(tag = %tag.short_form, ?branch, "Rewrote short-form tag");
    Some(rewritten)
}

/// Rewrite every occurrence of `tag` on `line`.
///
/// Whether the tag is written as a bare item or as a key is decided once,
/// from the incoming line, so every occurrence on it gets the same form.
/// The step runs at most once per sigil on the incoming line, plus one, and
/// stops early once a step changes nothing.
pub fn rewrite_tag(line: &str, next_line: Option<&str>, tag: &TagDefinition) -> String {
    let ceiling = sigil_count(line) + 1;
    let bare = LineContext::new(line, next_line, tag).branch() == Branch::BareSequenceItem;
    let mut current = line.to_string();

    for _ in 0..ceiling {
        if !current.contains(SIGIL) || is_escaped(&current) {
            break;
        }
        match step_in_form(&current, next_line, tag, bare) {
            Some(next) => current = next,
            None => break,
        }
    }

    current
}

/// Rewrite every cataloged tag on `line`, in catalog order.
///
/// `next_line` is the line that follows in the document, if any; it decides
/// whether a tag is a bare sequence item.
pub fn rewrite_line(line: &str, next_line: Option<&str>, catalog: &TagCatalog) -> String {
    if !line.contains(SIGIL) || is_escaped(line) {
        return line.to_string();
    }

    catalog
        .iter()
        .fold(line.to_string(), |current, tag| rewrite_tag(&current, next_line, tag))
}

/// Whether `line` still holds a cataloged short-form tag.
pub fn has_short_form(line: &str, catalog: &TagCatalog) -> bool {
    !is_escaped(line) && catalog.iter().any(|tag| !tag.short_form_offsets(line).is_empty())
}
