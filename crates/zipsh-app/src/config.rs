//! Command-line configuration for the zipsh binary.

use std::path::PathBuf;

/// Default VFS name shown in the prompt.
pub const DEFAULT_VFS_NAME: &str = "MYVFS";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Zip archive to load into the VFS at startup.
    pub archive: Option<PathBuf>,
    /// Script to run instead of the interactive loop.
    pub script: Option<PathBuf>,
    /// VFS name shown in the prompt.
    pub vfs_name: String,
    /// Print the effective configuration before starting.
    pub debug: bool,
    /// Print usage and exit.
    pub show_help: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            archive: None,
            script: None,
            vfs_name: DEFAULT_VFS_NAME.to_string(),
            debug: false,
            show_help: false,
        }
    }
}

impl ShellConfig {
    /// Parse options from an argument iterator (without the program name).
    pub fn from_args<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--vfs" | "-v" => {
                    let value = args.next().ok_or("--vfs requires a path argument")?;
                    config.archive = Some(PathBuf::from(value));
                },
                "--script" | "-s" => {
                    let value = args.next().ok_or("--script requires a path argument")?;
                    config.script = Some(PathBuf::from(value));
                },
                "--name" | "-n" => {
                    let value = args.next().ok_or("--name requires a value")?;
                    config.vfs_name = value;
                },
                "--debug" | "-d" => config.debug = true,
                "--help" | "-h" => config.show_help = true,
                other => return Err(format!("unknown option: {other}")),
            }
        }
        Ok(config)
    }
}

/// Usage text for `--help` and argument errors.
pub fn usage() -> String {
    [
        "zipsh — command shell over a zip-backed virtual filesystem",
        "",
        "Usage: zipsh [OPTIONS]",
        "",
        "Options:",
        "  -v, --vfs <archive.zip>   Load this archive into the VFS at startup",
        "  -s, --script <file>       Run a script instead of the interactive loop",
        "  -n, --name <name>         VFS name shown in the prompt (default: MYVFS)",
        "  -d, --debug               Print the effective configuration at startup",
        "  -h, --help                Show this help",
    ]
    .join("\n")
}
