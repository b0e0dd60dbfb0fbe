//! Leading-whitespace measurement.

/// Number of leading space characters. Tabs end the run like any other
/// character.
pub fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}

/// A run of `width` spaces.
pub fn indentation(width: usize) -> String {
    " ".repeat(width)
}
