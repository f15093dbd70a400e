//! Splitting a command string into whitespace-delimited argument tokens.

/// Characters that separate tokens. There is no quoting or escaping: a literal
/// `"` or `\` is an ordinary character.
const DELIMITERS: [char; 4] = [' ', '\t', '\n', '\r'];

/// Split a command string into owned argument tokens.
///
/// Runs of delimiter characters are collapsed, so empty tokens never appear in
/// the output. Empty or all-whitespace input yields an empty vector, which
/// callers treat as "no command". The input line itself is never mutated.
pub fn split_words(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
