use tasklet_shared::TaskDraft;
use tasklet_shared::task::{
  CATEGORY_CHOICES,
  PRIORITY_CHOICES
};
use web_sys::{
  Event,
  InputEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  NodeRef,
  Properties,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_effect_with,
  use_node_ref,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub on_add: Callback<TaskDraft>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let draft = use_state(TaskDraft::default);
  let category_ref = use_node_ref();
  let priority_ref = use_node_ref();

  // `selected` only seeds a select; once
  // the user has picked an option the
  // shown value has to be set directly.
  {
    let category_ref = category_ref.clone();
    let priority_ref = priority_ref.clone();
    use_effect_with(
      (
        draft.category.clone(),
        draft.priority.clone()
      ),
      move |(category, priority)| {
        sync_select(&category_ref, category);
        sync_select(&priority_ref, priority);
      }
    );
  }

  let on_text = input_setter(
    &draft,
    |draft, value| draft.text = value
  );
  let on_date = input_setter(
    &draft,
    |draft, value| draft.due_date = value
  );
  let on_time = input_setter(
    &draft,
    |draft, value| draft.due_time = value
  );
  let on_category = select_setter(
    &draft,
    |draft, value| draft.category = value
  );
  let on_priority = select_setter(
    &draft,
    |draft, value| draft.priority = value
  );

  let on_add_click = {
    let draft = draft.clone();
    let on_add = props.on_add.clone();
    Callback::from(
      move |_: MouseEvent| {
        let current = (*draft).clone();
        let next = current.next_after_submit();
        on_add.emit(current);
        draft.set(next);
      }
    )
  };

  html! {
      <div class="task-form">
          <input
              id="new-task"
              type="text"
              placeholder="Add a new task..."
              value={draft.text.clone()}
              oninput={on_text}
          />
          <select id="category" ref={category_ref} onchange={on_category}>
              {
                  for CATEGORY_CHOICES.into_iter().map(|choice| html! {
                      <option value={choice} selected={draft.category == choice}>{ choice }</option>
                  })
              }
          </select>
          <select id="priority" ref={priority_ref} onchange={on_priority}>
              {
                  for PRIORITY_CHOICES.into_iter().map(|choice| html! {
                      <option value={choice} selected={draft.priority == choice}>{ choice }</option>
                  })
              }
          </select>
          <input
              id="due-date"
              type="date"
              value={draft.due_date.clone()}
              oninput={on_date}
          />
          <input
              id="due-time"
              type="time"
              value={draft.due_time.clone()}
              oninput={on_time}
          />
          <button id="add-task-btn" onclick={on_add_click}>{ "Add Task" }</button>
      </div>
  }
}

fn input_setter(
  draft: &UseStateHandle<TaskDraft>,
  apply: fn(&mut TaskDraft, String)
) -> Callback<InputEvent> {
  let draft = draft.clone();
  Callback::from(
    move |e: InputEvent| {
      let input: web_sys::HtmlInputElement =
        e.target_unchecked_into();
      let mut next = (*draft).clone();
      apply(&mut next, input.value());
      draft.set(next);
    }
  )
}

fn select_setter(
  draft: &UseStateHandle<TaskDraft>,
  apply: fn(&mut TaskDraft, String)
) -> Callback<Event> {
  let draft = draft.clone();
  Callback::from(move |e: Event| {
    if let Some(select) = e
      .target_dyn_into::<
        web_sys::HtmlSelectElement
      >()
    {
      let mut next = (*draft).clone();
      apply(&mut next, select.value());
      draft.set(next);
    } else {
      tracing::warn!(
        "task form change event had \
         non-select target"
      );
    }
  })
}

fn sync_select(node: &NodeRef, value: &str) {
  if let Some(select) = node
    .cast::<web_sys::HtmlSelectElement>()
  {
    select.set_value(value);
  }
}
