// src/validator/mod.rs

//! Validation of untrusted command text.
//!
//! The generation service returns free text. Before anything is executed it
//! goes through [`CommandValidator::validate`], which either produces a
//! [`ValidatedCommand`] or a [`RejectionReason`]:
//!
//! 1. trim, and strip markdown fences ([`normalize`])
//! 2. require the approved program as the first word
//! 3. refuse shell chaining operators ([`rejection::find_forbidden_operator`])
//! 4. split into argv words, quote-aware ([`tokenize`])
//!
//! Validation is pure and idempotent.

pub mod normalize;
pub mod rejection;
pub mod tokenize;

use std::fmt;

use tracing::debug;

pub use normalize::strip_markdown;
pub use rejection::{RejectionReason, ShellOperator, find_forbidden_operator};
pub use tokenize::tokenize;

/// Program a generated command must invoke unless configured otherwise.
pub const DEFAULT_PROGRAM: &str = "kubectl";

/// A command that passed every validation rule.
///
/// Only [`CommandValidator::validate`] creates these. The first token is the
/// approved program and the text contains no chaining operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    normalized: String,
    tokens: Vec<String>,
}

impl ValidatedCommand {
    /// The normalized command line, as shown to the user.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// All argv words including the program.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

impl fmt::Display for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Applies the validation rules for one approved program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandValidator {
    program: String,
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandValidator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Validate a candidate command. The first failing rule decides the
    /// rejection.
    pub fn validate(&self, raw: &str) -> Result<ValidatedCommand, RejectionReason> {
        let normalized = strip_markdown(raw);

        if !self.has_program_prefix(&normalized) {
            debug!(program = %self.program, "candidate does not start with approved program");
            return Err(self.not_approved());
        }

        if let Some(operator) = find_forbidden_operator(&normalized) {
            debug!(%operator, "candidate contains forbidden operator");
            return Err(RejectionReason::ForbiddenOperator { operator });
        }

        let tokens = tokenize(&normalized)?;

        // The prefix check is textual; the first argv word must still be
        // exactly the program after quote removal.
        if tokens.first().map(String::as_str) != Some(self.program.as_str()) {
            return Err(self.not_approved());
        }

        if tokens[1..].iter().all(String::is_empty) {
            return Err(RejectionReason::MalformedCommand {
                detail: format!("'{}' needs at least one argument", self.program),
            });
        }

        Ok(ValidatedCommand { normalized, tokens })
    }

    /// `program` followed by an ASCII space or tab.
    fn has_program_prefix(&self, s: &str) -> bool {
        s.strip_prefix(self.program.as_str())
            .is_some_and(|rest| rest.starts_with([' ', '\t']))
    }

    fn not_approved(&self) -> RejectionReason {
        RejectionReason::NotApprovedProgram {
            expected: self.program.clone(),
        }
    }
}
