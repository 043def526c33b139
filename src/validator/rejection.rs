// src/validator/rejection.rs

use std::fmt;

use thiserror::Error;

/// Why a candidate command was refused.
///
/// All variants are user-correctable: rephrasing the request usually makes
/// the generation service produce an acceptable command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("invalid command: must start with '{expected}'")]
    NotApprovedProgram { expected: String },

    #[error("invalid command: contains shell operator '{operator}'")]
    ForbiddenOperator { operator: ShellOperator },

    #[error("invalid command format: {detail}")]
    MalformedCommand { detail: String },
}

/// Shell chaining/sequencing operators that are never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellOperator {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `;`
    Sequence,
    /// `|`
    Pipe,
    /// An embedded line break, which a shell treats like `;`.
    LineBreak,
}

impl ShellOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ShellOperator::And => "&&",
            ShellOperator::Or => "||",
            ShellOperator::Sequence => ";",
            ShellOperator::Pipe => "|",
            ShellOperator::LineBreak => "\\n",
        }
    }
}

impl fmt::Display for ShellOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the first forbidden operator in `s`, scanning left to right.
///
/// Two-character operators win over their one-character prefix at the same
/// position, so `a || b` reports `||` rather than `|`.
pub fn find_forbidden_operator(s: &str) -> Option<ShellOperator> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let next = bytes.get(i + 1).copied();
        let op = match (b, next) {
            (b'&', Some(b'&')) => ShellOperator::And,
            (b'|', Some(b'|')) => ShellOperator::Or,
            (b'|', _) => ShellOperator::Pipe,
            (b';', _) => ShellOperator::Sequence,
            (b'\n', _) | (b'\r', _) => ShellOperator::LineBreak,
            _ => continue,
        };
        return Some(op);
    }
    None
}
