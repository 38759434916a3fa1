use tasklet_shared::TaskRow;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:       TaskRow,
  pub on_toggle: Callback<u64>,
  pub on_delete: Callback<u64>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let id = props.row.id;
  let on_toggle =
    props.on_toggle.clone();
  let on_delete =
    props.on_delete.clone();

  let text_style = if props.row.overdue {
    "color: red;"
  } else {
    ""
  };

  html! {
      <li
          class={classes!(props.row.completed.then_some("completed"))}
          data-id={id.to_string()}
      >
          <span
              class={classes!(props.row.overdue.then_some("overdue"))}
              style={text_style}
          >
              { &props.row.label }
          </span>
          <div>
              <button
                  class="complete-btn"
                  onclick={move |_: MouseEvent| on_toggle.emit(id)}
              >
                  { props.row.toggle_label }
              </button>
              <button
                  class="delete-btn"
                  onclick={move |_: MouseEvent| on_delete.emit(id)}
              >
                  { props.row.delete_label }
              </button>
          </div>
      </li>
  }
}
