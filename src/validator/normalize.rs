// src/validator/normalize.rs

//! Removal of the markdown wrapping that chat models like to add.

use std::sync::LazyLock;

use regex::Regex;

const FENCE: &str = "```";

/// Opening fence with an optional info string (`bash`, `sh`, `shell`, ...)
/// that ends at a line break. An inline fence like ```` ```kubectl get x``` ````
/// has no line break, so only the backticks match.
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```(?:[A-Za-z0-9_+.-]*[ \t]*\r?\n)?").expect("opening fence pattern is valid")
});

/// Trim, drop code fences and any wrapping inline backticks, and trim again.
///
/// Applying this to its own output returns the output unchanged.
pub fn strip_markdown(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_opening = OPENING_FENCE.replace(trimmed, "");

    // Any fence that is left (closing or stray) carries no meaning for a
    // command line. Runs of backticks shrink to fewer than three.
    let mut s = without_opening.replace(FENCE, "");
    s = s.trim().to_string();

    while let Some(inner) = s.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        s = inner.trim().to_string();
    }

    s
}
