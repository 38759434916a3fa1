use std::collections::BTreeSet;

use tracing::{
  debug,
  trace
};

use crate::task::{
  Task,
  TaskDraft
};

/// In-memory task collection kept in
/// insertion order.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskStore {
  tasks: Vec<Task>
}

impl TaskStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_tasks(
    tasks: Vec<Task>
  ) -> Self {
    Self { tasks }
  }

  /// Appends a task built from `draft`
  /// and returns its id. Blank text is
  /// ignored and yields `None`.
  #[tracing::instrument(skip(self, draft))]
  pub fn add(
    &mut self,
    draft: TaskDraft,
    now_millis: u64
  ) -> Option<u64> {
    if draft.is_blank() {
      debug!("ignoring task with blank text");
      return None;
    }

    let id = self.next_id(now_millis);
    self
      .tasks
      .push(Task::from_draft(id, draft));
    debug!(
      id,
      count = self.tasks.len(),
      "task added"
    );
    Some(id)
  }

  /// Flips `completed` on the task
  /// with `id`. Returns whether any task
  /// matched.
  #[tracing::instrument(skip(self))]
  pub fn toggle_complete(
    &mut self,
    id: u64
  ) -> bool {
    let mut matched = false;
    for task in self
      .tasks
      .iter_mut()
      .filter(|task| task.id == id)
    {
      task.completed = !task.completed;
      matched = true;
      debug!(
        id,
        completed = task.completed,
        "toggled completion"
      );
    }

    if !matched {
      trace!(id, "toggle for unknown id");
    }
    matched
  }

  #[tracing::instrument(skip(self))]
  pub fn remove(
    &mut self,
    id: u64
  ) -> bool {
    let before = self.tasks.len();
    self
      .tasks
      .retain(|task| task.id != id);
    let removed =
      self.tasks.len() != before;
    if removed {
      debug!(
        id,
        count = self.tasks.len(),
        "task removed"
      );
    } else {
      trace!(id, "remove for unknown id");
    }
    removed
  }

  pub fn get(
    &self,
    id: u64
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  pub fn load_all(&self) -> &[Task] {
    &self.tasks
  }

  pub fn replace_all(
    &mut self,
    tasks: Vec<Task>
  ) {
    debug!(
      count = tasks.len(),
      "replacing task collection"
    );
    self.tasks = tasks;
  }

  /// First id that appears more than
  /// once in `tasks`, if any.
  pub fn duplicate_id(
    tasks: &[Task]
  ) -> Option<u64> {
    let mut seen = BTreeSet::new();
    tasks
      .iter()
      .map(|task| task.id)
      .find(|id| !seen.insert(*id))
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  // Timestamp ids collide when two adds
  // land in the same millisecond; step
  // past the current maximum instead.
  fn next_id(
    &self,
    now_millis: u64
  ) -> u64 {
    let max = self
      .tasks
      .iter()
      .map(|task| task.id)
      .max();
    match max {
      | Some(max) if now_millis <= max => {
        max.saturating_add(1)
      }
      | _ => now_millis
    }
  }
}
