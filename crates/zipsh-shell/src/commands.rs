//! Built-in commands for the zipsh shell.

use std::path::Path;

use zipsh_types::{Result, ZipshError};
use zipsh_vfs::{FileContent, VfsStore};

use crate::interpreter::{Command, CommandOutput, CommandRegistry};

/// Farewell line emitted by the surfaces when `exit` terminates them.
pub const FAREWELL: &str = "Bye.";

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(ExitCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(RevCmd));
    reg.register(Box::new(VfsInitCmd));
    reg.register(Box::new(LoadCmd));
    reg.register(Box::new(StatCmd));
}

fn ensure_loaded(vfs: &VfsStore) -> Result<()> {
    if vfs.is_loaded() {
        Ok(())
    } else {
        Err(ZipshError::NotLoaded)
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Leave the shell"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _vfs: &mut VfsStore) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit)
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print arguments joined by a single space"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str], _vfs: &mut VfsStore) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(args.join(" ")))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        ensure_loaded(vfs)?;
        let entries = vfs.list(args.first().copied())?;
        if entries.is_empty() {
            return Ok(CommandOutput::Text("(empty)".to_string()));
        }
        Ok(CommandOutput::Text(entries.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change working directory (no argument: go to /)"
    }
    fn usage(&self) -> &str {
        "cd [path]"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        ensure_loaded(vfs)?;
        vfs.change_dir(args.first().copied())?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, _args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        // Load-independent: an unloaded store still has cwd = "/".
        Ok(CommandOutput::Text(vfs.cwd().to_string()))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat <file...>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        ensure_loaded(vfs)?;
        if args.is_empty() {
            return Err(ZipshError::Command("usage: cat <file...>".to_string()));
        }
        let mut lines = Vec::new();
        for &arg in args {
            match vfs.read(arg) {
                Ok(FileContent::Text(text)) => lines.push(text.clone()),
                Ok(FileContent::Binary(_)) => {
                    lines.push(format!("cat: {arg}: binary file (content not shown)"));
                },
                Err(_) => lines.push(format!("cat: {arg}: no such file")),
            }
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// rev
// ---------------------------------------------------------------------------

struct RevCmd;
impl Command for RevCmd {
    fn name(&self) -> &str {
        "rev"
    }
    fn description(&self) -> &str {
        "Reverse a file's contents, or the argument itself when no such file exists"
    }
    fn usage(&self) -> &str {
        "rev <file|text...>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        ensure_loaded(vfs)?;
        if args.is_empty() {
            return Err(ZipshError::Command("usage: rev <file|text...>".to_string()));
        }
        let mut lines = Vec::new();
        for &arg in args {
            let abs = vfs.resolve(arg);
            if vfs.is_file(&abs) {
                match vfs.read_reversed(arg) {
                    Ok(reversed) => lines.push(reversed),
                    Err(_) => lines.push(format!("rev: {arg}: binary file")),
                }
            } else {
                // Not a file: fall back to reversing the literal argument.
                lines.push(arg.chars().rev().collect());
            }
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// vfs-init
// ---------------------------------------------------------------------------

struct VfsInitCmd;
impl Command for VfsInitCmd {
    fn name(&self) -> &str {
        "vfs-init"
    }
    fn description(&self) -> &str {
        "Reset the VFS to its empty, unloaded state"
    }
    fn usage(&self) -> &str {
        "vfs-init"
    }
    fn execute(&self, _args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        vfs.reset();
        Ok(CommandOutput::Text(
            "VFS reset: empty, nothing loaded.".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

struct LoadCmd;
impl Command for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }
    fn description(&self) -> &str {
        "Load a zip archive into the VFS"
    }
    fn usage(&self) -> &str {
        "load <archive.zip>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let Some(&path) = args.first() else {
            return Err(ZipshError::Command("usage: load <archive.zip>".to_string()));
        };
        let (files, folders) = vfs.load_path(Path::new(path))?;
        Ok(CommandOutput::Text(format!(
            "loaded {files} files and {folders} directories from {path}"
        )))
    }
}

// ---------------------------------------------------------------------------
// stat
// ---------------------------------------------------------------------------

struct StatCmd;
impl Command for StatCmd {
    fn name(&self) -> &str {
        "stat"
    }
    fn description(&self) -> &str {
        "Show entry metadata"
    }
    fn usage(&self) -> &str {
        "stat <path>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        ensure_loaded(vfs)?;
        let Some(&path) = args.first() else {
            return Err(ZipshError::Command("usage: stat <path>".to_string()));
        };
        let abs = vfs.resolve(path);
        if vfs.is_file(&abs) {
            let content = vfs.read(path)?;
            let mut lines = vec![
                format!("  File: {abs}"),
                "  Type: regular file".to_string(),
                format!("  Size: {} bytes", content.len()),
            ];
            match content.base64() {
                // Binary bytes are shown in base64 so they survive a
                // text-only terminal round trip.
                Some(encoded) => lines.push(format!("  Data: base64:{encoded}")),
                None => lines.push("  Data: text".to_string()),
            }
            Ok(CommandOutput::Text(lines.join("\n")))
        } else if vfs.is_dir(&abs) {
            Ok(CommandOutput::Text(format!(
                "  File: {abs}\n  Type: directory"
            )))
        } else {
            Err(ZipshError::Path(format!("{abs}: no such file or directory")))
        }
    }
}
