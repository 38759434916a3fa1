use anyhow::bail;
use tracing::{
  debug,
  error,
  info
};

use crate::clock::Clock;
use crate::filter::{
  StatusFilter,
  visible_tasks
};
use crate::persist::{
  self,
  KeyValueStore
};
use crate::store::TaskStore;
use crate::task::{
  Task,
  TaskDraft
};
use crate::theme::ThemeMode;
use crate::view::{
  TaskRow,
  render_rows
};

/// A user action routed through
/// [`AppState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Add(TaskDraft),
  ToggleComplete(u64),
  Remove(u64),
  SetFilter(StatusFilter),
  SetSearch(String),
  ToggleTheme
}

impl Command {
  pub fn name(&self) -> &'static str {
    match self {
      | Self::Add(_) => "add",
      | Self::ToggleComplete(_) => {
        "toggle"
      }
      | Self::Remove(_) => "delete",
      | Self::SetFilter(_) => "filter",
      | Self::SetSearch(_) => "search",
      | Self::ToggleTheme => "theme"
    }
  }
}

/// What a dispatched command changed.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct Outcome {
  pub tasks_changed: bool,
  pub view_changed:  bool,
  pub persisted:     bool
}

/// Everything one front end instance
/// works on: the task collection, its
/// backing store, and the UI state the
/// view is rendered with.
#[derive(Debug, Clone)]
pub struct AppState<S, C> {
  tasks:   TaskStore,
  storage: S,
  clock:   C,
  filter:  StatusFilter,
  search:  String,
  theme:   ThemeMode,
  dirty:   bool
}

impl<S, C> AppState<S, C>
where
  S: KeyValueStore,
  C: Clock
{
  /// Loads the persisted collection;
  /// the theme always starts light.
  #[tracing::instrument(skip_all)]
  pub fn open(
    storage: S,
    clock: C
  ) -> Self {
    let tasks = TaskStore::from_tasks(
      persist::load(&storage)
    );
    info!(
      count = tasks.len(),
      "application state opened"
    );
    Self {
      tasks,
      storage,
      clock,
      filter: StatusFilter::default(),
      search: String::new(),
      theme: ThemeMode::default(),
      dirty: false
    }
  }

  #[tracing::instrument(skip(self, command), fields(command = command.name()))]
  pub fn dispatch(
    &mut self,
    command: Command
  ) -> Outcome {
    let tasks_changed = match command {
      | Command::Add(draft) => {
        let now = self.clock.now_millis();
        self.tasks.add(draft, now).is_some()
      }
      | Command::ToggleComplete(id) => {
        self.tasks.toggle_complete(id)
      }
      | Command::Remove(id) => {
        self.tasks.remove(id)
      }
      | Command::SetFilter(filter) => {
        self.filter = filter;
        return Outcome {
          view_changed: true,
          ..Outcome::default()
        };
      }
      | Command::SetSearch(search) => {
        self.search = search;
        return Outcome {
          view_changed: true,
          ..Outcome::default()
        };
      }
      | Command::ToggleTheme => {
        self.theme = self.theme.toggle();
        debug!(theme = %self.theme, "theme toggled");
        return Outcome {
          view_changed: true,
          ..Outcome::default()
        };
      }
    };

    let persisted = if tasks_changed {
      self.persist()
    } else {
      false
    };

    Outcome {
      tasks_changed,
      view_changed: tasks_changed,
      persisted
    }
  }

  pub fn rows(&self) -> Vec<TaskRow> {
    render_rows(
      self.tasks.load_all(),
      self.filter,
      &self.search,
      self.clock.now_local()
    )
  }

  pub fn visible(&self) -> Vec<&Task> {
    visible_tasks(
      self.tasks.load_all(),
      self.filter,
      &self.search
    )
  }

  pub fn tasks(&self) -> &[Task] {
    self.tasks.load_all()
  }

  pub fn filter(&self) -> StatusFilter {
    self.filter
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn theme(&self) -> ThemeMode {
    self.theme
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// Swaps in a whole collection, e.g.
  /// an imported one, and writes it
  /// through. Repeated ids are refused
  /// and leave the current collection
  /// untouched.
  #[tracing::instrument(skip_all, fields(count = tasks.len()))]
  pub fn replace_all(
    &mut self,
    tasks: Vec<Task>
  ) -> anyhow::Result<Outcome> {
    if let Some(id) =
      TaskStore::duplicate_id(&tasks)
    {
      bail!("duplicate task id {id}");
    }

    self.tasks.replace_all(tasks);
    let persisted = self.persist();
    Ok(Outcome {
      tasks_changed: true,
      view_changed: true,
      persisted
    })
  }

  /// Reloads the collection from the
  /// backing store, discarding unsaved
  /// in-memory state.
  pub fn reload(&mut self) {
    self
      .tasks
      .replace_all(persist::load(
        &self.storage
      ));
    self.dirty = false;
  }

  /// Whether the collection holds
  /// changes the store has not seen.
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  /// Retries a failed write-through,
  /// then hands the backing store back.
  /// A clean state writes nothing, so a
  /// store that failed to parse is left
  /// as it was.
  #[tracing::instrument(skip_all, fields(dirty = self.dirty))]
  pub fn close(
    mut self
  ) -> anyhow::Result<S> {
    if self.dirty {
      persist::save(
        &mut self.storage,
        self.tasks.load_all()
      )?;
    }
    info!(
      count = self.tasks.len(),
      "application state closed"
    );
    Ok(self.storage)
  }

  fn persist(&mut self) -> bool {
    self.dirty = true;
    match persist::save(
      &mut self.storage,
      self.tasks.load_all()
    ) {
      | Ok(()) => {
        self.dirty = false;
        true
      }
      | Err(err) => {
        error!(
          error = %format!("{err:#}"),
          "failed to persist tasks"
        );
        false
      }
    }
  }
}
