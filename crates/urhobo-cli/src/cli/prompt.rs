//! Line prompts on stdin.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Prints `label` and reads one trimmed line.
///
/// # Errors
/// Fails when stdin is closed or unreadable.
pub fn ask(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    if read == 0 {
        anyhow::bail!("No input for {label} (stdin closed)");
    }
    Ok(line.trim().to_string())
}

/// Like [`ask`], returning `default` for an empty answer.
///
/// # Errors
/// Fails when stdin is closed or unreadable.
pub fn ask_with_default(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        return ask(label);
    }
    let answer = ask(&format!("{label} [{default}]"))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

/// Uses `value` when given, otherwise prompts.
///
/// # Errors
/// Fails when a prompt is needed and stdin is closed.
pub fn value_or_ask(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => ask(label),
    }
}
