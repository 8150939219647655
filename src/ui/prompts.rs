//! ui::prompts
//!
//! Interactive confirmation prompts for destructive choices.

use std::io::{self, Write};

/// Ask a yes/no question on stdin, defaulting to no.
///
/// Any read failure counts as a "no" so a closed stdin can never authorize
/// a destructive action.
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    input.trim().eq_ignore_ascii_case("y")
}
