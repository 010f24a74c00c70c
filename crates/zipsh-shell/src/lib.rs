//! Command interpreter and execution surfaces for zipsh.
//!
//! The interpreter is a registry-based dispatch system: commands implement
//! the `Command` trait and are registered by name. Both surfaces — the
//! interactive REPL and the batch script runner — drive the same pipeline:
//! line rewrite, tokenize, expand, dispatch.

mod commands;
mod interpreter;
mod repl;
mod script;

/// Farewell line emitted when `exit` terminates a surface.
pub use commands::FAREWELL;
/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, nothing, or the terminate signal).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Quote-aware word splitting.
pub use interpreter::tokenize;
/// Whole-token environment-reference expansion.
pub use interpreter::expand_exact_env_ref;
/// Leading `$`/`%` line rewrite to an `echo` invocation.
pub use interpreter::rewrite_line;
/// Interactive surface.
pub use repl::{prompt, run_repl};
/// Batch surface.
pub use script::{ScriptOutcome, run_script, run_script_path};
