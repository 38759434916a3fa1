pub mod app;
pub mod clock;
pub mod filter;
pub mod overdue;
pub mod persist;
pub mod store;
pub mod task;
pub mod theme;
pub mod view;

pub use app::{
  AppState,
  Command,
  Outcome
};
pub use clock::{
  Clock,
  FixedClock
};
pub use filter::{
  StatusFilter,
  visible_tasks
};
pub use overdue::is_overdue;
pub use persist::{
  KeyValueStore,
  MemoryStore,
  STORAGE_KEY
};
pub use store::TaskStore;
pub use task::{
  Task,
  TaskDraft
};
pub use theme::{
  ThemeIcon,
  ThemeMode
};
pub use view::TaskRow;
