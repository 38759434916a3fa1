use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{
  debug,
  warn
};

use crate::task::Task;

/// Key the task collection is stored
/// under.
pub const STORAGE_KEY: &str = "tasks";

/// A string key-value backend such as
/// browser `localStorage` or a data
/// directory.
pub trait KeyValueStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()>;
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(
    key: &str,
    value: &str
  ) -> Self {
    let mut entries = BTreeMap::new();
    entries.insert(
      key.to_string(),
      value.to_string()
    );
    Self { entries }
  }

  pub fn raw(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .entries
      .get(key)
      .map(String::as_str)
  }
}

impl KeyValueStore for MemoryStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self.entries.insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self.entries.remove(key);
    Ok(())
  }
}

/// Serializes the whole collection and
/// overwrites [`STORAGE_KEY`].
#[tracing::instrument(skip_all, fields(count = tasks.len()))]
pub fn save<S>(
  store: &mut S,
  tasks: &[Task]
) -> anyhow::Result<()>
where
  S: KeyValueStore + ?Sized
{
  let json =
    serde_json::to_string(tasks)
      .context(
        "failed to serialize tasks"
      )?;
  store
    .set(STORAGE_KEY, &json)
    .with_context(|| {
      format!(
        "failed to write key \
         {STORAGE_KEY}"
      )
    })?;
  debug!(
    bytes = json.len(),
    "saved task collection"
  );
  Ok(())
}

/// Reads the stored collection. Missing,
/// unreadable or unparsable data yields
/// an empty list.
#[tracing::instrument(skip_all)]
pub fn load<S>(store: &S) -> Vec<Task>
where
  S: KeyValueStore + ?Sized
{
  let raw = match store.get(STORAGE_KEY)
  {
    | Ok(Some(raw)) => raw,
    | Ok(None) => {
      debug!(
        "no stored tasks; starting \
         empty"
      );
      return Vec::new();
    }
    | Err(error) => {
      warn!(
        error = %format!("{error:#}"),
        "failed reading stored tasks; \
         starting empty"
      );
      return Vec::new();
    }
  };

  match serde_json::from_str::<
    Option<Vec<Task>>
  >(&raw)
  {
    | Ok(tasks) => {
      let tasks =
        tasks.unwrap_or_default();
      debug!(
        count = tasks.len(),
        "loaded task collection"
      );
      tasks
    }
    | Err(error) => {
      warn!(
        %error,
        "stored tasks are unparsable; \
         starting empty"
      );
      Vec::new()
    }
  }
}
