#![allow(dead_code, unused_imports)]

pub use ktalk_test_utils::{builders, fakes, init_tracing, stub_http, with_timeout};

use ktalk::validator::{CommandValidator, ValidatedCommand};

/// Validate `line` with `program` as the approved program, panicking on
/// rejection. Lets executor tests run ordinary system tools.
pub fn validated(program: &str, line: &str) -> ValidatedCommand {
    CommandValidator::new(program)
        .validate(line)
        .unwrap_or_else(|reason| panic!("'{line}' should validate: {reason}"))
}
