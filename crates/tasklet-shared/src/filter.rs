use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{
  Deserialize,
  Serialize
};
use tracing::trace;

use crate::task::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
  #[default]
  All,
  Active,
  Completed
}

impl StatusFilter {
  pub const ALL: [Self; 3] = [
    Self::All,
    Self::Active,
    Self::Completed
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Active => "active",
      | Self::Completed => "completed"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::All => "All",
      | Self::Active => "Active",
      | Self::Completed => "Completed"
    }
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Active => !task.completed,
      | Self::Completed => task.completed
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StatusFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str()
    {
      | "all" => Ok(Self::All),
      | "active" => Ok(Self::Active),
      | "completed" => Ok(Self::Completed),
      | other => Err(anyhow!(
        "unknown status filter: {other} \
         (expected all, active or \
         completed)"
      ))
    }
  }
}

/// Tasks matching `filter` whose text
/// contains `search`, case-insensitively,
/// in source order.
pub fn visible_tasks<'a>(
  tasks: &'a [Task],
  filter: StatusFilter,
  search: &str
) -> Vec<&'a Task> {
  let needle = search.to_lowercase();

  let visible: Vec<&Task> = tasks
    .iter()
    .filter(|task| filter.matches(task))
    .filter(|task| {
      needle.is_empty()
        || task
          .text
          .to_lowercase()
          .contains(&needle)
    })
    .collect();

  trace!(
    %filter,
    search,
    total = tasks.len(),
    visible = visible.len(),
    "filtered tasks"
  );
  visible
}

#[cfg(test)]
mod tests {
  use super::{
    StatusFilter,
    visible_tasks
  };
  use crate::task::Task;

  fn task(
    id: u64,
    text: &str,
    completed: bool
  ) -> Task {
    Task {
      id,
      text: text.to_string(),
      category: "Work".to_string(),
      priority: "Low".to_string(),
      due_date: String::new(),
      due_time: String::new(),
      completed
    }
  }

  fn sample() -> Vec<Task> {
    vec![
      task(1, "Buy milk", false),
      task(2, "Write report", true),
      task(3, "buy stamps", true),
      task(4, "Call plumber", false),
    ]
  }

  fn ids(tasks: &[&Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
  }

  #[test]
  fn active_is_incomplete_subset_in_order()
  {
    let tasks = sample();
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::Active,
        ""
      )),
      [1, 4]
    );
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::Completed,
        ""
      )),
      [2, 3]
    );
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::All,
        ""
      )),
      [1, 2, 3, 4]
    );
  }

  #[test]
  fn search_ignores_case() {
    let tasks = sample();
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::All,
        "BUY"
      )),
      [1, 3]
    );
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::All,
        "buy"
      )),
      [1, 3]
    );
  }

  #[test]
  fn search_combines_with_status() {
    let tasks = sample();
    assert_eq!(
      ids(&visible_tasks(
        &tasks,
        StatusFilter::Completed,
        "Buy"
      )),
      [3]
    );
    assert!(
      visible_tasks(
        &tasks,
        StatusFilter::Active,
        "report"
      )
      .is_empty()
    );
  }

  #[test]
  fn parses_filter_names() {
    for filter in StatusFilter::ALL {
      assert_eq!(
        filter
          .as_str()
          .parse::<StatusFilter>()
          .expect("parse"),
        filter
      );
    }
    assert!(
      "done"
        .parse::<StatusFilter>()
        .is_err()
    );
  }
}
