//! Recognizing and stripping the output-redirection clause of a command.

use std::path::PathBuf;

/// Token that introduces an output redirection.
const REDIRECT_MARKER: &str = ">";

/// Errors produced while resolving a redirection clause.
///
/// Every variant is terminal for its command: the command is reported as
/// failed and never executed. The variants are distinguished for tests and
/// diagnostics only; they all surface to the user identically.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsingError {
    /// The marker is the first token, so no command name precedes it.
    RedirectWithoutCommand,
    /// Nothing follows the marker.
    MissingRedirectTarget,
    /// More than one token follows the marker.
    TrailingAfterRedirect,
    /// The marker appears more than once.
    MultipleRedirects,
}

impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParsingError::RedirectWithoutCommand => "redirection without a command",
            ParsingError::MissingRedirectTarget => "redirection without a target",
            ParsingError::TrailingAfterRedirect => "extra tokens after redirection target",
            ParsingError::MultipleRedirects => "more than one redirection",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParsingError {}

/// Scan `argv` for a single trailing `> target` clause and split it off.
///
/// On success the marker and target are removed from `argv` and the target
/// path is returned; `None` means no clause was present and `argv` is
/// untouched. Any other shape fails without modifying `argv`, so a malformed
/// clause is never partially applied.
pub fn take_redirect(argv: &mut Vec<String>) -> Result<Option<PathBuf>, ParsingError> {
    let mut markers = argv.iter().enumerate().filter(|(_, t)| *t == REDIRECT_MARKER);

    let Some((index, _)) = markers.next() else {
        return Ok(None);
    };
    if markers.next().is_some() {
        return Err(ParsingError::MultipleRedirects);
    }
    if index == 0 {
        return Err(ParsingError::RedirectWithoutCommand);
    }
    match argv.len() - index {
        1 => Err(ParsingError::MissingRedirectTarget),
        2 => {
            let target = PathBuf::from(argv.pop().expect("target checked present"));
            argv.pop(); // the marker
            Ok(Some(target))
        }
        _ => Err(ParsingError::TrailingAfterRedirect),
    }
}
