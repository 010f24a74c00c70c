//! Command trait, registry, tokenizer, and environment-reference expansion.

use std::borrow::Cow;
use std::collections::HashMap;

use zipsh_types::{Result, ZipshError};
use zipsh_vfs::VfsStore;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines, printed by the surface.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the surface to stop reading input.
    Exit,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[path\]").
    fn usage(&self) -> &str;

    /// Execute the command against the VFS store.
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Run a full input line through the pipeline: leading-reference
    /// rewrite, tokenize, per-token expansion, dispatch.
    ///
    /// Command names are case-insensitive.
    pub fn execute(&self, line: &str, vfs: &mut VfsStore) -> Result<CommandOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(CommandOutput::None);
        }

        let line = rewrite_line(trimmed);
        let tokens = tokenize(&line)?;
        if tokens.is_empty() {
            return Ok(CommandOutput::None);
        }
        let expanded: Vec<String> = tokens.iter().map(|t| expand_exact_env_ref(t)).collect();

        let name = expanded[0].to_ascii_lowercase();
        let args: Vec<&str> = expanded[1..].iter().map(String::as_str).collect();

        // `help` needs registry access, so it is intercepted here.
        if name == "help" {
            return self.execute_help(&args);
        }

        match self.commands.get(&name) {
            Some(cmd) => cmd.execute(&args, vfs),
            None => Err(ZipshError::Command(format!(
                "unknown command: {}",
                expanded[0]
            ))),
        }
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            let name_lower = name.to_ascii_lowercase();
            match self.commands.get(&name_lower) {
                Some(cmd) => {
                    let mut out = format!("{}\n", cmd.name());
                    out.push_str(&format!("  {}\n", cmd.description()));
                    out.push_str(&format!("  Usage: {}", cmd.usage()));
                    Ok(CommandOutput::Text(out))
                },
                None => Err(ZipshError::Command(format!("unknown command: {name}"))),
            }
        } else {
            let cmds = self.list_commands();
            let mut out = format!("Commands ({}):\n", cmds.len() + 1);
            for (name, desc) in &cmds {
                out.push_str(&format!("  {name:10} {desc}\n"));
            }
            out.push_str("  help       List available commands\n");
            out.push_str("\nType 'help <command>' for details.");
            Ok(CommandOutput::Text(out))
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Line rewrite: a bare variable reference becomes an echo argument
// ---------------------------------------------------------------------------

/// Rewrite a line that starts with `$` or `%` (which covers `$env:` too) to
/// an `echo` invocation, so a bare reference is echoed instead of being
/// dispatched as an unknown command.
pub fn rewrite_line(line: &str) -> Cow<'_, str> {
    if line.starts_with('$') || line.starts_with('%') {
        Cow::Owned(format!("echo {line}"))
    } else {
        Cow::Borrowed(line)
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: handles single quotes, double quotes, and backslash escapes
// ---------------------------------------------------------------------------

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Single-quoted strings preserve all characters literally.
/// - Double-quoted strings group words; backslash escapes `"`, `\` and `$`.
/// - Backslash escapes the next character outside of quotes.
/// - A quoted empty string (`""` or `''`) is a token in its own right.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;
    // Quoting makes a word exist even when it contributes no characters.
    let mut was_quoted = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            if ch == '"' {
                in_double = false;
            } else if ch == '\\'
                && let Some(&next) = chars.peek()
            {
                match next {
                    '"' | '\\' | '$' => {
                        current.push(chars.next().unwrap());
                    },
                    _ => {
                        current.push('\\');
                    },
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    was_quoted = true;
                },
                '"' => {
                    in_double = true;
                    was_quoted = true;
                },
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() || was_quoted {
                        tokens.push(std::mem::take(&mut current));
                    }
                    was_quoted = false;
                },
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(ZipshError::Parse("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(ZipshError::Parse("unterminated double quote".to_string()));
    }

    if !current.is_empty() || was_quoted {
        tokens.push(current);
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Environment-reference expansion
// ---------------------------------------------------------------------------

/// Expand a token that is, in full, one of the reference forms `$NAME`,
/// `${NAME}`, `%NAME%`, or `$env:NAME` (case-insensitive `env`).
///
/// The match must consume the entire token; partial references and unset
/// variables leave the token unchanged.
pub fn expand_exact_env_ref(token: &str) -> String {
    expand_with(token, |name| std::env::var(name).ok())
}

/// Expansion against an arbitrary variable lookup, the testable seam behind
/// [`expand_exact_env_ref`].
fn expand_with(token: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let substitute = |name: &str| -> Option<String> {
        if is_var_name(name) { lookup(name) } else { None }
    };

    // ${NAME}
    if let Some(inner) = token.strip_prefix("${")
        && let Some(name) = inner.strip_suffix('}')
        && !name.is_empty()
    {
        return substitute(name).unwrap_or_else(|| token.to_string());
    }

    // $env:NAME (PowerShell style; checked before bare $NAME so the `env:`
    // prefix is not mistaken for a variable name)
    if let Some(prefix) = token.get(..5)
        && prefix.eq_ignore_ascii_case("$env:")
        && token.len() > 5
    {
        return substitute(&token[5..]).unwrap_or_else(|| token.to_string());
    }

    // $NAME
    if let Some(name) = token.strip_prefix('$')
        && !name.is_empty()
        && !token.contains('{')
    {
        return substitute(name).unwrap_or_else(|| token.to_string());
    }

    // %NAME% (cmd.exe style)
    if let Some(inner) = token.strip_prefix('%')
        && let Some(name) = inner.strip_suffix('%')
        && !name.is_empty()
    {
        return substitute(name).unwrap_or_else(|| token.to_string());
    }

    token.to_string()
}

/// Valid environment-variable name: `[A-Za-z_][A-Za-z0-9_]*`.
fn is_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- tokenize ---------------------------------------------------------

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("echo hello world").unwrap(), ["echo", "hello", "world"]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(tokenize("  cat   a.txt \t b.txt ").unwrap(), ["cat", "a.txt", "b.txt"]);
    }

    #[test]
    fn single_quotes_group_literally() {
        assert_eq!(
            tokenize("echo 'two words' '$HOME'").unwrap(),
            ["echo", "two words", "$HOME"]
        );
    }

    #[test]
    fn double_quotes_group_and_escape() {
        assert_eq!(
            tokenize(r#"echo "a b" "say \"hi\"""#).unwrap(),
            ["echo", "a b", r#"say "hi""#]
        );
    }

    #[test]
    fn quoted_empty_string_is_a_token() {
        assert_eq!(tokenize(r#"echo "" x"#).unwrap(), ["echo", "", "x"]);
        assert_eq!(tokenize("echo '' x").unwrap(), ["echo", "", "x"]);
        assert_eq!(tokenize(r#""""#).unwrap(), [""]);
        assert_eq!(tokenize("cat ''").unwrap(), ["cat", ""]);
    }

    #[test]
    fn adjacent_quotes_join_into_one_token() {
        assert_eq!(tokenize(r#"a""b"#).unwrap(), ["ab"]);
        assert_eq!(tokenize("''x").unwrap(), ["x"]);
    }

    #[test]
    fn backslash_escapes_outside_quotes() {
        assert_eq!(tokenize(r"echo a\ b").unwrap(), ["echo", "a b"]);
    }

    #[test]
    fn unterminated_single_quote_is_parse_error() {
        let err = tokenize("echo 'oops").unwrap_err();
        assert!(matches!(err, ZipshError::Parse(_)));
    }

    #[test]
    fn unterminated_double_quote_is_parse_error() {
        let err = tokenize("echo \"oops").unwrap_err();
        assert!(matches!(err, ZipshError::Parse(_)));
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    // -- expansion --------------------------------------------------------

    fn fake_env(token: &str) -> String {
        expand_with(token, |name| match name {
            "HOME" => Some("/home/user".to_string()),
            "MY_VAR1" => Some("value one".to_string()),
            _ => None,
        })
    }

    #[test]
    fn dollar_name_expands() {
        assert_eq!(fake_env("$HOME"), "/home/user");
    }

    #[test]
    fn braced_name_expands() {
        assert_eq!(fake_env("${HOME}"), "/home/user");
    }

    #[test]
    fn percent_name_expands() {
        assert_eq!(fake_env("%HOME%"), "/home/user");
    }

    #[test]
    fn env_prefix_expands_case_insensitively() {
        assert_eq!(fake_env("$env:HOME"), "/home/user");
        assert_eq!(fake_env("$ENV:HOME"), "/home/user");
        assert_eq!(fake_env("$Env:MY_VAR1"), "value one");
    }

    #[test]
    fn unset_variable_is_identity() {
        assert_eq!(fake_env("$NOPE"), "$NOPE");
        assert_eq!(fake_env("${NOPE}"), "${NOPE}");
        assert_eq!(fake_env("%NOPE%"), "%NOPE%");
        assert_eq!(fake_env("$env:NOPE"), "$env:NOPE");
    }

    #[test]
    fn partial_references_are_identity() {
        assert_eq!(fake_env("$HOME-suffix"), "$HOME-suffix");
        assert_eq!(fake_env("${HOME"), "${HOME");
        assert_eq!(fake_env("pre$HOME"), "pre$HOME");
        assert_eq!(fake_env("%HOME"), "%HOME");
    }

    #[test]
    fn invalid_names_are_identity() {
        assert_eq!(fake_env("$1BAD"), "$1BAD");
        assert_eq!(fake_env("${A-B}"), "${A-B}");
        assert_eq!(fake_env("$"), "$");
        assert_eq!(fake_env("%%"), "%%");
    }

    #[test]
    fn plain_tokens_are_identity() {
        assert_eq!(fake_env("hello"), "hello");
        assert_eq!(fake_env("a$b"), "a$b");
    }

    #[test]
    fn real_env_unset_variable_passes_through() {
        // Nothing sets this name; exercises the std::env-backed wrapper.
        assert_eq!(
            expand_exact_env_ref("$ZIPSH_SURELY_UNSET_VAR_XYZ"),
            "$ZIPSH_SURELY_UNSET_VAR_XYZ"
        );
    }

    #[test]
    fn var_name_validation() {
        assert!(is_var_name("HOME"));
        assert!(is_var_name("_x9"));
        assert!(!is_var_name(""));
        assert!(!is_var_name("9lives"));
        assert!(!is_var_name("a-b"));
    }

    // -- rewrite ----------------------------------------------------------

    #[test]
    fn leading_dollar_becomes_echo() {
        assert_eq!(rewrite_line("$HOME"), "echo $HOME");
        assert_eq!(rewrite_line("$env:PATH more"), "echo $env:PATH more");
    }

    #[test]
    fn leading_percent_becomes_echo() {
        assert_eq!(rewrite_line("%USERNAME%"), "echo %USERNAME%");
    }

    #[test]
    fn ordinary_lines_are_untouched() {
        assert!(matches!(rewrite_line("ls /docs"), Cow::Borrowed(_)));
        assert_eq!(rewrite_line("echo $HOME"), "echo $HOME");
    }

    // -- registry dispatch --------------------------------------------------

    use zipsh_vfs::VfsStore;

    struct UpperCmd;
    impl Command for UpperCmd {
        fn name(&self) -> &str {
            "upper"
        }
        fn description(&self) -> &str {
            "Uppercase arguments"
        }
        fn usage(&self) -> &str {
            "upper <text...>"
        }
        fn execute(&self, args: &[&str], _vfs: &mut VfsStore) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ").to_uppercase()))
        }
    }

    #[test]
    fn register_and_execute() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(UpperCmd));
        let mut vfs = VfsStore::new();
        assert_eq!(
            reg.execute("upper hello world", &mut vfs).unwrap(),
            CommandOutput::Text("HELLO WORLD".to_string())
        );
    }

    #[test]
    fn dispatch_is_case_insensitive() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(UpperCmd));
        let mut vfs = VfsStore::new();
        assert_eq!(
            reg.execute("UPPER hi", &mut vfs).unwrap(),
            CommandOutput::Text("HI".to_string())
        );
    }

    #[test]
    fn unknown_command_names_the_command() {
        let reg = CommandRegistry::new();
        let mut vfs = VfsStore::new();
        let err = reg.execute("frobnicate", &mut vfs).unwrap_err();
        assert_eq!(format!("{err}"), "unknown command: frobnicate");
    }

    #[test]
    fn empty_and_whitespace_lines_are_none() {
        let reg = CommandRegistry::new();
        let mut vfs = VfsStore::new();
        assert_eq!(reg.execute("", &mut vfs).unwrap(), CommandOutput::None);
        assert_eq!(reg.execute("  \t ", &mut vfs).unwrap(), CommandOutput::None);
    }

    #[test]
    fn parse_error_propagates() {
        let reg = CommandRegistry::new();
        let mut vfs = VfsStore::new();
        let err = reg.execute("upper 'unterminated", &mut vfs).unwrap_err();
        assert!(matches!(err, ZipshError::Parse(_)));
    }

    #[test]
    fn help_lists_registered_commands() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(UpperCmd));
        let mut vfs = VfsStore::new();
        match reg.execute("help", &mut vfs).unwrap() {
            CommandOutput::Text(s) => {
                assert!(s.contains("upper"));
                assert!(s.contains("help"));
            },
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn help_for_one_command_shows_usage() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(UpperCmd));
        let mut vfs = VfsStore::new();
        match reg.execute("help upper", &mut vfs).unwrap() {
            CommandOutput::Text(s) => assert!(s.contains("upper <text...>")),
            _ => panic!("expected text"),
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokens_without_references_expand_to_themselves(
                token in "[a-z][a-z0-9._/-]{0,20}",
            ) {
                prop_assert_eq!(fake_env(&token), token);
            }

            #[test]
            fn expansion_never_panics(token in "\\PC{0,30}") {
                let _ = fake_env(&token);
            }

            #[test]
            fn tokenize_unquoted_words_round_trip(
                words in proptest::collection::vec("[a-z0-9._-]{1,8}", 1..6),
            ) {
                let line = words.join(" ");
                let tokens = tokenize(&line).unwrap();
                prop_assert_eq!(tokens, words);
            }
        }
    }
}
