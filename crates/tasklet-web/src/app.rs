use std::rc::Rc;

use tasklet_shared::{
  AppState,
  Command,
  StatusFilter,
  TaskDraft,
  ThemeMode
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::components::{
  FilterBar,
  TaskForm,
  TaskList,
  ThemeToggle
};
use crate::storage::{
  BrowserClock,
  LocalStorage
};

type PageState =
  AppState<LocalStorage, BrowserClock>;

/// Page-wide state; every UI event
/// arrives here as a [`Command`].
#[derive(Clone)]
struct Page {
  state: PageState
}

impl Page {
  fn open() -> Self {
    Self {
      state: AppState::open(
        LocalStorage,
        BrowserClock
      )
    }
  }
}

impl Reducible for Page {
  type Action = Command;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    let name = action.name();
    let outcome =
      next.state.dispatch(action);
    tracing::debug!(
      command = name,
      ?outcome,
      "ui command"
    );
    Rc::new(next)
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let page = use_reducer(Page::open);
  let theme = page.state.theme();

  {
    use_effect_with(theme, |theme| {
      apply_body_theme(*theme);
    });
  }

  let on_add = {
    let page = page.dispatcher();
    Callback::from(
      move |draft: TaskDraft| {
        page.dispatch(Command::Add(draft));
      }
    )
  };

  let on_toggle = {
    let page = page.dispatcher();
    Callback::from(move |id: u64| {
      page.dispatch(
        Command::ToggleComplete(id)
      );
    })
  };

  let on_delete = {
    let page = page.dispatcher();
    Callback::from(move |id: u64| {
      page.dispatch(Command::Remove(id));
    })
  };

  let on_filter = {
    let page = page.dispatcher();
    Callback::from(
      move |filter: StatusFilter| {
        page.dispatch(Command::SetFilter(
          filter
        ));
      }
    )
  };

  let on_search = {
    let page = page.dispatcher();
    Callback::from(
      move |search: String| {
        page.dispatch(Command::SetSearch(
          search
        ));
      }
    )
  };

  let on_toggle_theme = {
    let page = page.dispatcher();
    Callback::from(
      move |_: MouseEvent| {
        page.dispatch(Command::ToggleTheme);
      }
    )
  };

  let rows = page.state.rows();

  html! {
      <div class="container">
          <div class="title-bar">
              <h1>{ "To-Do List" }</h1>
              <ThemeToggle theme={theme} on_toggle={on_toggle_theme} />
          </div>
          <TaskForm on_add={on_add} />
          <FilterBar
              active={page.state.filter()}
              search={page.state.search().to_string()}
              on_filter={on_filter}
              on_search={on_search}
          />
          <TaskList rows={rows} on_toggle={on_toggle} on_delete={on_delete} />
      </div>
  }
}

fn apply_body_theme(theme: ThemeMode) {
  let Some(body) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| document.body())
  else {
    tracing::warn!(
      "no document body to theme"
    );
    return;
  };

  if let Err(error) = body
    .class_list()
    .toggle_with_force(
      "dark",
      theme.body_class().is_some()
    )
  {
    tracing::error!(
      ?error,
      "failed toggling body theme \
       class"
    );
  }
}
