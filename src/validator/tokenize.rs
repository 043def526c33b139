// src/validator/tokenize.rs

use crate::validator::rejection::RejectionReason;

/// Split a command line into argv words using POSIX shell quoting rules.
///
/// Quotes group words (`-o jsonpath='{.items[*].metadata.name}'` stays one
/// argument) but nothing is expanded: `$VAR`, globs and backticks are passed
/// through literally because the command is never handed to a shell.
pub fn tokenize(command: &str) -> Result<Vec<String>, RejectionReason> {
    shell_words::split(command).map_err(|e| RejectionReason::MalformedCommand {
        detail: e.to_string(),
    })
}
