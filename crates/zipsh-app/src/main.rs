//! zipsh binary: parse arguments, set up logging, pick a surface.

mod config;

use std::io;

use anyhow::bail;

use zipsh_shell::{CommandRegistry, register_builtins, run_repl, run_script_path};
use zipsh_vfs::VfsStore;

use crate::config::{ShellConfig, usage};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ShellConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{}", usage());
            std::process::exit(2);
        },
    };

    if config.show_help {
        println!("{}", usage());
        return Ok(());
    }

    if config.debug {
        println!("config: {config:?}");
    }

    let mut vfs = VfsStore::new();
    if let Some(archive) = &config.archive {
        // A bad startup archive is not fatal; the shell starts unloaded.
        match vfs.load_path(archive) {
            Ok((files, folders)) => {
                log::info!(
                    "loaded {files} files and {folders} directories from {}",
                    archive.display()
                );
            },
            Err(e) => println!("error: {e}"),
        }
    }

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);

    if let Some(script) = &config.script {
        let outcome = run_script_path(
            script,
            &config.vfs_name,
            &registry,
            &mut vfs,
            &mut io::stdout(),
        );
        match outcome {
            Ok(outcome) => {
                log::debug!(
                    "script done: {} lines executed, terminated={}",
                    outcome.executed,
                    outcome.terminated
                );
            },
            Err(e) => bail!("{e}"),
        }
    } else {
        run_repl(&config.vfs_name, &registry, &mut vfs)?;
    }

    Ok(())
}
