//! Interactive surface: a rustyline-backed read-eval-print loop.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use zipsh_types::Result;
use zipsh_vfs::VfsStore;

use crate::commands::FAREWELL;
use crate::interpreter::{CommandOutput, CommandRegistry};

/// Render the prompt for the current VFS state, e.g. `[MYVFS /docs/]$ `.
pub fn prompt(name: &str, cwd: &str) -> String {
    format!("[{name} {cwd}]$ ")
}

/// Run the interactive loop until `exit`, Ctrl-D, or Ctrl-C.
pub fn run_repl(name: &str, registry: &CommandRegistry, vfs: &mut VfsStore) -> Result<()> {
    let mut editor: Editor<(), DefaultHistory> =
        Editor::new().map_err(|e| std::io::Error::other(e.to_string()))?;

    println!("zipsh — type 'help' for commands, 'exit' to leave.");
    loop {
        match editor.readline(&prompt(name, vfs.cwd())) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(&line);
                }
                match registry.execute(&line, vfs) {
                    Ok(CommandOutput::Text(text)) => println!("{text}"),
                    Ok(CommandOutput::None) => {},
                    Ok(CommandOutput::Exit) => {
                        println!("{FAREWELL}");
                        break;
                    },
                    Err(e) => println!("error: {e}"),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!();
                break;
            },
            Err(e) => {
                log::warn!("readline failed: {e}");
                break;
            },
        }
    }
    Ok(())
}
