//! Quoting of `!Sub` arguments.
//!
//! In short form `!Sub my-${AWS::Region}` the tag makes the argument a
//! string. Once the tag becomes a `"Fn::Sub":` key that guarantee is gone,
//! so a plain argument is wrapped in double quotes first.

use crate::catalog::TagDefinition;
use crate::nesting::LineContext;

/// Quote the argument of a lone `!Sub` occurrence.
///
/// Returns `None` when the line is left as is: another tag, several
/// occurrences, a pipe marker on the line (block scalar), an empty argument,
/// or an argument that is already a quoted string or a flow collection.
pub fn quote_substitution_argument(
    line: &str,
    tag: &TagDefinition,
    context: &LineContext,
) -> Option<String> {
    if !tag.is_substitution() || !context.is_single_occurrence() || context.has_pipe {
        return None;
    }

    let argument_start = context.occurrences[0] + tag.short_form.len();
    let argument = &line[argument_start..];
    let trimmed = argument.trim();
    if trimmed.is_empty() || is_quoted(trimmed) || is_flow_collection(trimmed) {
        return None;
    }

    let leading = argument.len() - argument.trim_start().len();
    let value_start = argument_start + leading;
    let value_end = value_start + trimmed.len();

    let mut quoted = String::with_capacity(line.len() + 2);
    quoted.push_str(&line[..value_start]);
    quoted.push_str(&wrap_in_double_quotes(trimmed));
    quoted.push_str(&line[value_end..]);
    Some(quoted)
}

/// Text is wrapped in a matching pair of double or single quotes.
pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
}

fn is_flow_collection(text: &str) -> bool {
    text.starts_with('[') || text.starts_with('{')
}

/// Double-quote `text`, escaping what a double-quoted scalar requires.
pub fn wrap_in_double_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(line: &str, name: &str) -> Option<String> {
        let tag = TagDefinition::new(name);
        let context = LineContext::new(line, None, &tag);
        quote_substitution_argument(line, &tag, &context)
    }

    #[test]
    fn test_unquoted_argument_is_wrapped() {
        assert_eq!(
            quote("Value: !Sub my-${AWS::Region}-bucket", "Sub").as_deref(),
            Some("Value: !Sub \"my-${AWS::Region}-bucket\"")
        );
    }

    #[test]
    fn test_trailing_whitespace_is_kept_outside_quotes() {
        assert_eq!(
            quote("  Name: !Sub  ${Env}-app  ", "Sub").as_deref(),
            Some("  Name: !Sub  \"${Env}-app\"  ")
        );
    }

    #[test]
    fn test_already_quoted_is_untouched() {
        assert_eq!(quote("Value: !Sub \"my-${AWS::Region}-bucket\"", "Sub"), None);
        assert_eq!(quote("Value: !Sub 'my-bucket'", "Sub"), None);
    }

    #[test]
    fn test_pipe_marker_blocks_quoting() {
        assert_eq!(quote("UserData: !Sub |", "Sub"), None);
    }

    #[test]
    fn test_other_tags_and_structured_arguments_are_untouched() {
        assert_eq!(quote("Value: !Ref MyBucket", "Ref"), None);
        assert_eq!(quote("Value: !Sub [\"${A}\", {A: !Ref B}]", "Sub"), None);
        assert_eq!(quote("Value: !Sub", "Sub"), None);
    }

    #[test]
    fn test_inner_quotes_are_escaped() {
        assert_eq!(wrap_in_double_quotes(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(wrap_in_double_quotes(r"a\b"), r#""a\\b""#);
    }
}
