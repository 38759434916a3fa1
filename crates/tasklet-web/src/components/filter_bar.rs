use tasklet_shared::StatusFilter;
use web_sys::InputEvent;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub active:    StatusFilter,
  pub search:    String,
  pub on_filter: Callback<StatusFilter>,
  pub on_search: Callback<String>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let on_search_input = {
    let on_search =
      props.on_search.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        on_search.emit(input.value());
      }
    )
  };

  html! {
      <div class="filters">
          <input
              id="search-task"
              type="text"
              placeholder="Search tasks..."
              value={props.search.clone()}
              oninput={on_search_input}
          />
          {
              for StatusFilter::ALL.into_iter().map(|filter| {
                  let on_filter = props.on_filter.clone();
                  html! {
                      <button
                          class={classes!("filter", (props.active == filter).then_some("active"))}
                          data-filter={filter.as_str()}
                          onclick={move |_: MouseEvent| on_filter.emit(filter)}
                      >
                          { filter.label() }
                      </button>
                  }
              })
          }
      </div>
  }
}
