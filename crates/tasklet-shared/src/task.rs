use serde::{
  Deserialize,
  Serialize
};

pub const DEFAULT_CATEGORY: &str =
  "Work";
pub const DEFAULT_PRIORITY: &str =
  "Low";

pub const CATEGORY_CHOICES: [&str; 3] =
  ["Work", "Personal", "Other"];
pub const PRIORITY_CHOICES: [&str; 3] =
  ["Low", "Medium", "High"];

/// A single to-do item as it is
/// persisted: field names follow the
/// stored JSON layout (`dueDate`,
/// `dueTime`), and unset due fields
/// are empty strings.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:        u64,
  pub text:      String,
  #[serde(default)]
  pub category:  String,
  #[serde(default)]
  pub priority:  String,
  #[serde(default)]
  pub due_date:  String,
  #[serde(default)]
  pub due_time:  String,
  #[serde(default)]
  pub completed: bool
}

impl Task {
  pub fn from_draft(
    id: u64,
    draft: TaskDraft
  ) -> Self {
    Self {
      id,
      text: draft.text.trim().to_string(),
      category: draft.category,
      priority: draft.priority,
      due_date: draft.due_date,
      due_time: draft.due_time,
      completed: false
    }
  }

  pub fn has_due(&self) -> bool {
    !self.due_date.is_empty()
      && !self.due_time.is_empty()
  }
}

/// Contents of the add form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
  pub text:     String,
  pub category: String,
  pub priority: String,
  pub due_date: String,
  pub due_time: String
}

impl Default for TaskDraft {
  fn default() -> Self {
    Self {
      text:     String::new(),
      category: DEFAULT_CATEGORY
        .to_string(),
      priority: DEFAULT_PRIORITY
        .to_string(),
      due_date: String::new(),
      due_time: String::new()
    }
  }
}

impl TaskDraft {
  pub fn new(
    text: impl Into<String>
  ) -> Self {
    Self {
      text: text.into(),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn category(
    mut self,
    category: impl Into<String>
  ) -> Self {
    self.category = category.into();
    self
  }

  #[must_use]
  pub fn priority(
    mut self,
    priority: impl Into<String>
  ) -> Self {
    self.priority = priority.into();
    self
  }

  #[must_use]
  pub fn due(
    mut self,
    date: impl Into<String>,
    time: impl Into<String>
  ) -> Self {
    self.due_date = date.into();
    self.due_time = time.into();
    self
  }

  pub fn is_blank(&self) -> bool {
    self.text.trim().is_empty()
  }

  /// Form contents once this draft has
  /// been submitted: cleared back to the
  /// defaults when it was accepted, kept
  /// as typed when it was blank.
  pub fn next_after_submit(&self) -> Self {
    if self.is_blank() {
      self.clone()
    } else {
      Self::default()
    }
  }
}
