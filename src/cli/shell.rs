use std::{
    borrow::Cow,
    env,
    io::{self, BufRead, IsTerminal},
};

use once_cell::sync::Lazy;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::{
    output,
    shell_context::{CliMode, CommandError, ShellContext},
};
use crate::errors::CliError;

/// Set when `AUTOVALUE_CLI_SCRIPT` is present, read once per process.
static SCRIPT_REQUESTED: Lazy<bool> = Lazy::new(|| env::var_os("AUTOVALUE_CLI_SCRIPT").is_some());

const CONFIG_ACTIONS: [&str; 4] = ["backup", "backups", "restore", "show"];

/// Runs the arguments as one command, or reads commands from stdin when there are none.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        return run_oneshot(&args);
    }

    let mode = if *SCRIPT_REQUESTED || !io::stdin().is_terminal() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        _ => run_script(&mut context),
    }
}

fn run_oneshot(args: &[String]) -> Result<(), CliError> {
    let mut context = ShellContext::new(CliMode::Oneshot)?;
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command, rest),
        None => return Ok(()),
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command.to_ascii_lowercase(), command, &rest) {
        Ok(()) | Err(CommandError::ExitRequested) => Ok(()),
        Err(CommandError::Rejected(status)) => Err(CliError::Command(format!(
            "`{command}` returned status {status}"
        ))),
        Err(err) => {
            let message = err.to_string();
            context.report_error(err);
            Err(CliError::Command(message))
        }
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        match editor.readline(context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if let Err(err) = handle_line(context, trimmed) {
                    context.report_error(err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Interrupted. Type `exit` to leave the shell.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if let Err(err) = handle_line(context, &line) {
            context.report_error(err);
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<(), CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(());
    }

    let tokens = match split(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse `{trimmed}`: {err}"));
            return Ok(());
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(());
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&raw.to_ascii_lowercase(), raw, &args) {
        Err(CommandError::ExitRequested) => {
            context.running = false;
            Ok(())
        }
        other => other,
    }
}

/// Tab and `?` completion for command names, `help` topics, and `config` actions.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Start offset of the word under the cursor and its completions.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = line.get(..pos).unwrap_or(line);
        let start = prefix
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let preceding: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();

        let pool: Vec<&str> = match preceding.as_slice() {
            [] => self.commands.iter().map(String::as_str).collect(),
            [command] if command == "help" => self.commands.iter().map(String::as_str).collect(),
            [command] if command == "config" => CONFIG_ACTIONS.to_vec(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|name| name.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(line, pos);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec!["trade-in-valuation", "tables", "help", "config", "Exit"])
    }

    #[test]
    fn quoted_json_stays_one_token() {
        let tokens = split(r#"warranty-quote '{"vehicleId": "v 1", "termMonths": 24}'"#).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].contains("\"v 1\""));
    }

    #[test]
    fn command_names_complete_from_prefix() {
        let (start, names) = helper().candidates("t", 1);
        assert_eq!(start, 0);
        assert_eq!(names, vec!["tables", "trade-in-valuation"]);

        let (_, names) = helper().candidates("EX", 2);
        assert_eq!(names, vec!["exit"]);
    }

    #[test]
    fn arguments_complete_only_where_they_name_something() {
        let (start, names) = helper().candidates("help tr", 7);
        assert_eq!(start, 5);
        assert_eq!(names, vec!["trade-in-valuation"]);

        let (_, names) = helper().candidates("config back", 11);
        assert_eq!(names, vec!["backup", "backups"]);

        let (_, names) = helper().candidates("trade-in-valuation t", 20);
        assert!(names.is_empty());
    }
}
