//! UI utilities for the client.

use std::io::Write;

pub const PROMPT: &str = "walkie> ";

/// Print a block of output, then redisplay the prompt
pub fn print_with_prompt(output: &str) {
    print!("{}", output);
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
