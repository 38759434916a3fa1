use chrono::NaiveDateTime;

use crate::filter::{
  StatusFilter,
  visible_tasks
};
use crate::overdue::is_overdue;
use crate::task::Task;

pub const COMPLETE_LABEL: &str =
  "Complete";
pub const UNDO_LABEL: &str = "Undo";
pub const DELETE_LABEL: &str = "Delete";

/// One displayed task with its action
/// labels resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
  pub id:           u64,
  pub label:        String,
  pub completed:    bool,
  pub overdue:      bool,
  pub toggle_label: &'static str,
  pub delete_label: &'static str
}

impl TaskRow {
  pub fn from_task(
    task: &Task,
    now: NaiveDateTime
  ) -> Self {
    Self {
      id:           task.id,
      label:        task_label(task),
      completed:    task.completed,
      overdue:      is_overdue(
        &task.due_date,
        &task.due_time,
        now
      ),
      toggle_label: if task.completed {
        UNDO_LABEL
      } else {
        COMPLETE_LABEL
      },
      delete_label: DELETE_LABEL
    }
  }
}

pub fn task_label(task: &Task) -> String {
  format!(
    "{} [{}] (Priority: {}, Due: {} at \
     {})",
    task.text,
    task.category,
    task.priority,
    task.due_date,
    task.due_time
  )
}

/// Full replacement view of the tasks
/// visible under `filter` and `search`.
pub fn render_rows(
  tasks: &[Task],
  filter: StatusFilter,
  search: &str,
  now: NaiveDateTime
) -> Vec<TaskRow> {
  visible_tasks(tasks, filter, search)
    .into_iter()
    .map(|task| TaskRow::from_task(task, now))
    .collect()
}
