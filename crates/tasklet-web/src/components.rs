mod filter_bar;
mod task_form;
mod task_list;
mod task_list_row;
mod theme_toggle;

pub use filter_bar::FilterBar;
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
pub use theme_toggle::ThemeToggle;
