use std::io::{BufRead, Write};

use anyhow::{anyhow, bail};
use clap::{CommandFactory, Parser, Subcommand};
use tasklet_shared::{AppState, Clock, Command, KeyValueStore, StatusFilter};
use tracing::{debug, info, instrument};

use crate::cli::AddArgs;
use crate::commands::write_view;
use crate::render::Renderer;

const PROMPT: &str = "tasklet> ";

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(
    name = "",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct ShellLine {
    #[command(subcommand)]
    action: ShellAction,
}

#[derive(Subcommand, Debug)]
enum ShellAction {
    /// Add a task.
    Add(AddArgs),
    /// Flip completion of a task.
    Toggle { id: u64 },
    /// Delete a task.
    Delete { id: u64 },
    /// Show all, active or completed tasks.
    Filter { filter: StatusFilter },
    /// Narrow the list to tasks containing text; no text clears the search.
    /// Unquoted words are joined by single spaces; quote the text to keep
    /// its exact spacing.
    Search {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Switch between light and dark.
    Theme,
    /// Show the list again.
    List,
    /// Re-read tasks from storage.
    Reload,
    /// Show this help.
    Help,
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Processes `input` one line at a time until EOF or `quit`, re-rendering the
/// view after every command that changes it.
#[instrument(skip_all)]
pub fn run<S, C, R, W>(
    state: &mut AppState<S, C>,
    renderer: &mut Renderer,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    renderer.set_theme(state.theme());
    write_view(state, renderer, &mut output)?;

    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("shell input closed");
            break;
        }

        let tokens = match split_line(&line) {
            Ok(tokens) => tokens,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                continue;
            }
        };
        if tokens.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(output, "{}", err.render())?;
                continue;
            }
        };

        let command = match parsed.action {
            ShellAction::Add(args) => Command::Add(args.into_draft()),
            ShellAction::Toggle { id } => Command::ToggleComplete(id),
            ShellAction::Delete { id } => Command::Remove(id),
            ShellAction::Filter { filter } => Command::SetFilter(filter),
            ShellAction::Search { text } => Command::SetSearch(text.join(" ")),
            ShellAction::Theme => Command::ToggleTheme,
            ShellAction::List => {
                write_view(state, renderer, &mut output)?;
                continue;
            }
            ShellAction::Reload => {
                state.reload();
                write_view(state, renderer, &mut output)?;
                continue;
            }
            ShellAction::Help => {
                writeln!(output, "{}", ShellLine::command().render_help())?;
                continue;
            }
            ShellAction::Quit => {
                info!("shell quit");
                break;
            }
        };

        let outcome = state.dispatch(command);
        debug!(?outcome, "shell command dispatched");
        renderer.set_theme(state.theme());
        write_view(state, renderer, &mut output)?;
    }

    Ok(())
}

/// Splits a shell line into words. Whitespace separates words except inside
/// single or double quotes; a backslash outside single quotes takes the next
/// character literally.
fn split_line(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some('\''), ch) => current.push(ch),
            (_, '\\') => {
                let escaped = chars.next().ok_or_else(|| anyhow!("trailing backslash"))?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), ch) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, ch) if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, ch) => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        bail!("unterminated {open} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tasklet_shared::{AppState, FixedClock, MemoryStore, StatusFilter, ThemeMode};

    use super::{run, split_line};
    use crate::render::Renderer;

    fn state() -> AppState<MemoryStore, FixedClock> {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid instant");
        AppState::open(MemoryStore::new(), FixedClock::new(at))
    }

    fn drive(state: &mut AppState<MemoryStore, FixedClock>, script: &str) -> String {
        let mut renderer = Renderer::plain();
        let mut out = Vec::new();
        run(state, &mut renderer, script.as_bytes(), &mut out).expect("shell run");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn scripted_session_mutates_and_rerenders() {
        let mut state = state();
        let out = drive(
            &mut state,
            "add Ship release --priority High --due-date 2020-01-01 --due-time 09:00\n\
             add Buy milk\n\
             filter active\n\
             search MILK\n\
             theme\n\
             quit\n\
             add never reached\n",
        );

        assert_eq!(state.tasks().len(), 2);
        assert_eq!(state.filter(), StatusFilter::Active);
        assert_eq!(state.search(), "MILK");
        assert_eq!(state.theme(), ThemeMode::Dark);
        assert!(out.contains("Ship release [Work] (Priority: High, Due: 2020-01-01 at 09:00)"));
        assert!(out.contains("overdue"));
        assert!(out.contains("\u{2600} dark"));
    }

    #[test]
    fn toggle_and_delete_by_id() {
        let mut state = state();
        drive(&mut state, "add one\nadd two\n");
        let first = state.tasks()[0].id;
        let second = state.tasks()[1].id;

        drive(&mut state, &format!("toggle {first}\ndelete {second}\ndelete 1\n"));
        assert_eq!(state.tasks().len(), 1);
        assert!(state.tasks()[0].completed);
    }

    #[test]
    fn bad_lines_report_and_continue() {
        let mut state = state();
        let out = drive(&mut state, "frobnicate\nfilter done\ntoggle abc\nadd kept\n");
        assert!(out.contains("error"));
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.filter(), StatusFilter::All);
    }

    #[test]
    fn empty_search_clears() {
        let mut state = state();
        drive(&mut state, "search foo bar\n");
        assert_eq!(state.search(), "foo bar");
        drive(&mut state, "search\n");
        assert_eq!(state.search(), "");
    }

    #[test]
    fn quotes_keep_inner_spacing() {
        assert_eq!(
            split_line(r#"search "a  b"  c"#).expect("split"),
            ["search", "a  b", "c"]
        );
        assert_eq!(
            split_line(r#"add 'it''s' don\'t "" "#).expect("split"),
            ["add", "its", "don't", ""]
        );
        assert!(split_line("search \"open").is_err());
        assert!(split_line("add x\\").is_err());
    }

    #[test]
    fn quoted_search_matches_double_spaces() {
        let mut state = state();
        drive(
            &mut state,
            "add \"pay  rent\"\nadd pay rent\nsearch \"pay  rent\"\n",
        );
        assert_eq!(state.search(), "pay  rent");
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.visible()[0].text, "pay  rent");

        let out = drive(&mut state, "search \"unterminated\nadd after\n");
        assert!(out.contains("unterminated"));
        assert_eq!(state.tasks().len(), 3);
    }
}
