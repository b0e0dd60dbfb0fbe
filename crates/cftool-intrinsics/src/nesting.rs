//! Per-line context and the choice between bare-item and key replacement.
//!
//! A short-form tag is rewritten one of two ways:
//!
//! - as a bare scalar (`"Fn::Sub"`) when it is a sequence item value and the
//!   next line continues the sequence
//! - as a mapping key (`"Fn::Sub":`) otherwise, pushed onto its own line when
//!   it sits inside the inline argument of an already rewritten function

use crate::catalog::{CANONICAL_PREFIX, TagDefinition};
use crate::indent::{indentation, leading_spaces};

/// Marker opening a block scalar continuation.
pub const PIPE_MARKER: char = '|';

/// Extra indentation given to a nested function moved to its own line.
pub const NESTED_INDENT: usize = 2;

/// How a short-form occurrence will be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Replace with the quoted long form, no colon.
    BareSequenceItem,

    /// Replace with the `"long":` key. `nested` moves it onto a new line.
    MappingValue { nested: bool },
}

/// Facts about one line, computed for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    /// Leading spaces of the line
    pub indent: usize,

    /// The line holds a pipe marker anywhere
    pub has_pipe: bool,

    /// The following line starts a sequence entry
    pub next_is_sequence_item: bool,

    /// The line is a sequence entry whose value is the tag applied to a
    /// plain scalar, e.g. `- !Ref Role`
    pub is_sequence_value: bool,

    /// Byte offsets of the tag's short form
    pub occurrences: Vec<usize>,

    /// Text before the first occurrence already holds a canonical key
    pub follows_canonical_key: bool,
}

impl LineContext {
    pub fn new(line: &str, next_line: Option<&str>, tag: &TagDefinition) -> Self {
        let occurrences = tag.short_form_offsets(line);
        let first = occurrences.first().copied();

        Self {
            indent: leading_spaces(line),
            has_pipe: line.contains(PIPE_MARKER),
            next_is_sequence_item: next_line.is_some_and(starts_sequence_item),
            is_sequence_value: first.is_some_and(|offset| {
                sequence_value_offset(line) == Some(offset)
                    && takes_scalar_argument(&line[offset + tag.short_form.len()..])
            }),
            follows_canonical_key: first.is_some_and(|offset| line[..offset].contains(CANONICAL_PREFIX)),
            occurrences,
        }
    }

    /// Exactly one occurrence: the split around the short form has two parts.
    pub fn is_single_occurrence(&self) -> bool {
        self.occurrences.len() == 1
    }

    pub fn branch(&self) -> Branch {
        let standalone = !self.is_single_occurrence() || self.is_sequence_value;
        if self.next_is_sequence_item && standalone {
            Branch::BareSequenceItem
        } else {
            self.mapping_branch()
        }
    }

    /// The key branch, nested when a canonical key precedes the occurrence.
    pub fn mapping_branch(&self) -> Branch {
        Branch::MappingValue {
            nested: self.follows_canonical_key,
        }
    }
}

/// Whether a line opens a sequence entry (`- item` or a lone `-`).
pub fn starts_sequence_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- ") || trimmed.trim_end() == "-"
}

/// Offset of the value of a sequence entry line, if the line is one.
fn sequence_value_offset(line: &str) -> Option<usize> {
    let after_dash = line.trim_start_matches(' ').strip_prefix('-')?;
    let value = after_dash.trim_start();
    if value.len() == after_dash.len() {
        return None;
    }
    Some(line.len() - value.len())
}

/// A flow collection argument (`[...]`, `{...}`) makes the tag a key.
fn takes_scalar_argument(rest: &str) -> bool {
    !rest.trim_start().starts_with(['[', '{'])
}

/// The key text replacing a short form in the mapping branch.
pub fn key_replacement(tag: &TagDefinition, nested: bool, indent: usize) -> String {
    if nested {
        format!("\n{}{}", indentation(indent + NESTED_INDENT), tag.key_form())
    } else {
        tag.key_form()
    }
}
