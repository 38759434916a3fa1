use std::fs;
use std::io::{self, Write};

use anyhow::Context;
use tasklet_shared::{AppState, Clock, Command, KeyValueStore, Task};
use tracing::{debug, info, instrument, warn};

use crate::cli::{CliCommand, ListArgs};
use crate::config::Config;
use crate::render::Renderer;
use crate::shell;

#[instrument(skip(state, cfg, renderer, command))]
pub fn dispatch<S, C>(
    state: &mut AppState<S, C>,
    cfg: &Config,
    renderer: &mut Renderer,
    command: CliCommand,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    debug!(?command, "dispatching command");

    match command {
        CliCommand::Add(args) => {
            info!("command add");
            let outcome = state.dispatch(Command::Add(args.into_draft()));
            if !outcome.tasks_changed {
                info!("blank task text; nothing added");
            }
            print_view(state, renderer)
        }
        CliCommand::List(args) => {
            info!("command list");
            apply_view(state, renderer, &args);
            print_view(state, renderer)
        }
        CliCommand::Toggle { id } => {
            info!(id, "command toggle");
            if !state.dispatch(Command::ToggleComplete(id)).tasks_changed {
                warn!(id, "no task with that id");
            }
            print_view(state, renderer)
        }
        CliCommand::Delete { id } => {
            info!(id, "command delete");
            if !state.dispatch(Command::Remove(id)).tasks_changed {
                warn!(id, "no task with that id");
            }
            print_view(state, renderer)
        }
        CliCommand::Export(args) => {
            info!("command export");
            apply_view(state, renderer, &args);
            let mut out = io::stdout().lock();
            write_export(state, &mut out)
        }
        CliCommand::Import { path } => {
            info!(path = %path.display(), "command import");
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let tasks: Vec<Task> = serde_json::from_str(&raw)
                .with_context(|| format!("failed parsing {}", path.display()))?;
            let count = tasks.len();
            let outcome = state
                .replace_all(tasks)
                .with_context(|| format!("refusing to import {}", path.display()))?;
            if !outcome.persisted {
                warn!("imported tasks were not persisted");
            }
            println!("imported {count} tasks");
            Ok(())
        }
        CliCommand::Config => {
            let mut out = io::stdout().lock();
            write_config(cfg, &mut out)
        }
        CliCommand::Shell => {
            info!("command shell");
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            shell::run(state, renderer, stdin, stdout)
        }
    }
}

/// Routes list options through the dispatch table so the view state lives in
/// one place.
pub fn apply_view<S, C>(state: &mut AppState<S, C>, renderer: &mut Renderer, args: &ListArgs)
where
    S: KeyValueStore,
    C: Clock,
{
    state.dispatch(Command::SetFilter(args.filter));
    state.dispatch(Command::SetSearch(args.search.clone()));
    if state.theme() != args.theme {
        state.dispatch(Command::ToggleTheme);
    }
    renderer.set_theme(state.theme());
}

pub fn write_view<S, C, W>(
    state: &AppState<S, C>,
    renderer: &Renderer,
    out: W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
    W: Write,
{
    renderer.write_rows(out, &state.rows(), state.filter(), state.search())
}

fn print_view<S, C>(state: &AppState<S, C>, renderer: &Renderer) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    renderer.print_rows(&state.rows(), state.filter(), state.search())
}

pub fn write_export<S, C, W>(state: &AppState<S, C>, mut out: W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
    W: Write,
{
    let visible = state.visible();
    let json = serde_json::to_string_pretty(&visible).context("failed to serialize tasks")?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_config<W: Write>(cfg: &Config, mut out: W) -> anyhow::Result<()> {
    for (key, value) in cfg.iter() {
        writeln!(out, "{key} = {value}")?;
    }
    for file in &cfg.loaded_files {
        writeln!(out, "# loaded {}", file.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tasklet_shared::{AppState, Command, FixedClock, MemoryStore, StatusFilter, TaskDraft, ThemeMode};

    use std::fs;

    use tempfile::tempdir;

    use super::{apply_view, dispatch, write_config, write_export};
    use crate::cli::{CliCommand, ListArgs};
    use crate::config::Config;
    use crate::render::Renderer;

    fn state() -> AppState<MemoryStore, FixedClock> {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid instant");
        AppState::open(MemoryStore::new(), FixedClock::new(at))
    }

    #[test]
    fn list_options_flow_through_dispatch() {
        let mut state = state();
        let mut renderer = Renderer::plain();
        apply_view(
            &mut state,
            &mut renderer,
            &ListArgs {
                filter: StatusFilter::Completed,
                search: "x".to_string(),
                theme: ThemeMode::Dark,
            },
        );
        assert_eq!(state.filter(), StatusFilter::Completed);
        assert_eq!(state.search(), "x");
        assert_eq!(state.theme(), ThemeMode::Dark);
        assert_eq!(renderer.theme(), ThemeMode::Dark);

        apply_view(&mut state, &mut renderer, &ListArgs::default());
        assert_eq!(state.theme(), ThemeMode::Light);
    }

    #[test]
    fn export_prints_visible_tasks_as_stored_json() {
        let mut state = state();
        state.dispatch(Command::Add(TaskDraft::new("Buy milk")));
        state.dispatch(Command::Add(TaskDraft::new("Walk dog")));
        state.dispatch(Command::SetSearch("milk".to_string()));

        let mut buf = Vec::new();
        write_export(&state, &mut buf).expect("export");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        let items = value.as_array().expect("array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["text"], "Buy milk");
        assert_eq!(items[0]["dueDate"], "");
        assert_eq!(items[0]["completed"], false);
    }

    #[test]
    fn config_listing_is_sorted() {
        let mut buf = Vec::new();
        write_config(&Config::default(), &mut buf).expect("config");
        let text = String::from_utf8(buf).expect("utf8");
        let keys: Vec<&str> = text
            .lines()
            .filter_map(|line| line.split_once(" = ").map(|(k, _)| k))
            .collect();
        assert_eq!(keys, ["color", "data.location", "default.command"]);
    }

    #[test]
    fn import_replaces_collection() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("import.json");
        fs::write(&path, r#"[{"id":5,"text":"a"},{"id":6,"text":"b","completed":true}]"#)
            .expect("write import");

        let mut state = state();
        state.dispatch(Command::Add(TaskDraft::new("replaced")));
        dispatch(&mut state, &Config::default(), &mut Renderer::plain(), CliCommand::Import { path })
            .expect("import");

        let ids: Vec<u64> = state.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, [5, 6]);
        assert!(state.tasks()[1].completed);
        assert!(!state.is_dirty());
    }

    #[test]
    fn import_with_repeated_ids_is_refused() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("import.json");
        fs::write(&path, r#"[{"id":5,"text":"a"},{"id":5,"text":"b"}]"#).expect("write import");

        let mut state = state();
        state.dispatch(Command::Add(TaskDraft::new("kept")));
        let err = dispatch(&mut state, &Config::default(), &mut Renderer::plain(), CliCommand::Import { path })
            .expect_err("repeated ids");

        assert!(format!("{err:#}").contains("duplicate task id 5"));
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.tasks()[0].text, "kept");
    }
}
