use std::ffi::OsString;
use std::fs;

use chrono::NaiveDate;
use tasklet_core::commands::write_view;
use tasklet_core::datastore::FileStore;
use tasklet_core::render::Renderer;
use tasklet_core::shell;
use tasklet_shared::persist::{
  STORAGE_KEY,
  load
};
use tasklet_shared::{
  AppState,
  Command,
  FixedClock,
  KeyValueStore,
  TaskDraft
};
use tempfile::tempdir;

fn clock() -> FixedClock {
  FixedClock::new(
    NaiveDate::from_ymd_opt(2025, 1, 1)
      .and_then(|d| d.and_hms_opt(0, 0, 0))
      .expect("valid instant")
  )
}

#[test]
fn file_store_round_trip_across_reopen() {
  let temp = tempdir().expect("tempdir");
  let store = FileStore::open(temp.path())
    .expect("open datastore");

  let mut state =
    AppState::open(store, clock());
  state.dispatch(Command::Add(
    TaskDraft::new("Ship release")
      .category("Work")
      .priority("High")
      .due("2024-01-01", "09:00")
  ));
  let id = state.tasks()[0].id;
  state
    .dispatch(Command::ToggleComplete(id));

  let on_disk = fs::read_to_string(
    temp.path().join("tasks.json")
  )
  .expect("read tasks.json");
  assert!(on_disk.contains("\"dueDate\":\"2024-01-01\""));
  assert!(on_disk.contains("\"completed\":true"));

  let expected = state.tasks().to_vec();
  let store = state.close().expect("close");
  let reopened =
    AppState::open(store, clock());
  assert_eq!(reopened.tasks(), &expected[..]);
}

#[test]
fn corrupt_file_degrades_to_empty() {
  let temp = tempdir().expect("tempdir");
  fs::write(
    temp.path().join("tasks.json"),
    "{{{ not json"
  )
  .expect("write corrupt file");

  let store = FileStore::open(temp.path())
    .expect("open datastore");
  assert!(load(&store).is_empty());

  let mut state =
    AppState::open(store, clock());
  assert!(state.tasks().is_empty());
  state.dispatch(Command::Add(
    TaskDraft::new("fresh start")
  ));
  assert_eq!(
    load(state.storage()).len(),
    1
  );
}

#[test]
fn shell_session_persists_every_mutation()
{
  let temp = tempdir().expect("tempdir");
  let store = FileStore::open(temp.path())
    .expect("open datastore");
  let mut state =
    AppState::open(store, clock());
  let mut renderer = Renderer::plain();

  let mut out = Vec::new();
  shell::run(
    &mut state,
    &mut renderer,
    "add Buy milk --category Personal\n\
     add Pay rent --priority High\n"
      .as_bytes(),
    &mut out
  )
  .expect("shell");

  let raw = state
    .storage()
    .get(STORAGE_KEY)
    .expect("read store")
    .expect("tasks stored");
  let stored: Vec<serde_json::Value> =
    serde_json::from_str(&raw)
      .expect("stored json");
  assert_eq!(stored.len(), 2);
  assert_eq!(stored[0]["category"], "Personal");
  assert_eq!(stored[1]["priority"], "High");

  let mut view = Vec::new();
  write_view(&state, &renderer, &mut view)
    .expect("view");
  let view =
    String::from_utf8(view).expect("utf8");
  assert!(view.contains("Buy milk [Personal]"));
  assert!(view.contains("Pay rent [Work] (Priority: High"));
}

#[test]
fn read_only_commands_leave_unparsable_file_untouched()
{
  let temp = tempdir().expect("tempdir");
  let file = temp.path().join("tasks.json");
  let corrupt =
    r#"[{"id":1,"text":"keep me","completed":false},]"#;
  fs::write(&file, corrupt)
    .expect("write corrupt file");

  for command in ["list", "export", "config"] {
    let args: Vec<OsString> = [
      "tasklet",
      "--taskletrc",
      "/dev/null",
      "--data",
      temp.path().to_str().expect("utf8 path"),
      command
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    tasklet_core::run(args)
      .expect("read-only command");

    assert_eq!(
      fs::read_to_string(&file)
        .expect("read tasks.json"),
      corrupt,
      "after {command}"
    );
  }
}
