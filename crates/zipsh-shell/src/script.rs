//! Batch surface: run a script through the same interpreter as the REPL.
//!
//! Each executable line is echoed with the prompt it would have shown
//! interactively, so a script transcript reads like a recorded session.
//! Blank lines and `#` comments are reproduced verbatim and skipped.

use std::fs;
use std::io::Write;
use std::path::Path;

use zipsh_types::{Result, ZipshError};
use zipsh_vfs::VfsStore;

use crate::commands::FAREWELL;
use crate::interpreter::{CommandOutput, CommandRegistry};
use crate::repl::prompt;

/// Summary of a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Number of non-blank, non-comment lines executed.
    pub executed: usize,
    /// Whether the script hit `exit` before its last line.
    pub terminated: bool,
}

/// Read a script file and run it.
pub fn run_script_path<W: Write>(
    path: &Path,
    name: &str,
    registry: &CommandRegistry,
    vfs: &mut VfsStore,
    out: &mut W,
) -> Result<ScriptOutcome> {
    if !path.exists() {
        return Err(ZipshError::Script(format!(
            "script not found: {}",
            path.display()
        )));
    }
    let bytes = fs::read(path)?;
    let source = String::from_utf8(bytes).map_err(|_| {
        ZipshError::Script(format!("script is not valid UTF-8: {}", path.display()))
    })?;
    run_script(&source, name, registry, vfs, out)
}

/// Run script source line by line. Errors on individual lines are
/// reported and the run continues; only `exit` stops it early.
pub fn run_script<W: Write>(
    source: &str,
    name: &str,
    registry: &CommandRegistry,
    vfs: &mut VfsStore,
    out: &mut W,
) -> Result<ScriptOutcome> {
    let mut outcome = ScriptOutcome {
        executed: 0,
        terminated: false,
    };
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            writeln!(out, "{line}")?;
            continue;
        }
        writeln!(out, "{}{line}", prompt(name, vfs.cwd()))?;
        outcome.executed += 1;
        match registry.execute(line, vfs) {
            Ok(CommandOutput::Text(text)) => writeln!(out, "{text}")?,
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Exit) => {
                writeln!(out, "{FAREWELL}")?;
                outcome.terminated = true;
                return Ok(outcome);
            },
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    Ok(outcome)
}
