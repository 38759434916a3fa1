use tasklet_shared::{
  ThemeIcon,
  ThemeMode
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
  pub theme:     ThemeMode,
  pub on_toggle: Callback<MouseEvent>
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(
  props: &ThemeToggleProps
) -> Html {
  let icon = props.theme.icon();
  let style = format!(
    "background-color: {};",
    props.theme.toggle_background()
  );
  let title = match props.theme {
    | ThemeMode::Light => {
      "Switch to dark mode"
    }
    | ThemeMode::Dark => {
      "Switch to light mode"
    }
  };

  html! {
      <button
          id="darkModeToggle"
          title={title}
          style={style}
          onclick={props.on_toggle.clone()}
      >
          { icon_svg(icon) }
      </button>
  }
}

fn icon_svg(icon: ThemeIcon) -> Html {
  let shapes = match icon {
    | ThemeIcon::Moon => html! {
        <path
            d="M21 12.8A9 9 0 1 1 11.2 3a7 7 0 0 0 9.8 9.8z"
            stroke="currentColor"
            stroke-width="1.5"
            stroke-linecap="round"
            stroke-linejoin="round"
        />
    },
    | ThemeIcon::Sun => html! {
        <>
            <circle cx="12" cy="12" r="5" stroke="currentColor" stroke-width="1.5" />
            <path
                d="M12 1v2M12 21v2M4.2 4.2l1.4 1.4M18.4 18.4l1.4 1.4M1 12h2M21 12h2M4.2 19.8l1.4-1.4M18.4 5.6l1.4-1.4"
                stroke="currentColor"
                stroke-width="1.5"
                stroke-linecap="round"
            />
        </>
    }
  };

  html! {
      <svg
          xmlns="http://www.w3.org/2000/svg"
          viewBox="0 0 24 24"
          width="24"
          height="24"
          color={icon.color()}
          fill="none"
      >
          <title>{ icon.glyph() }</title>
          { shapes }
      </svg>
  }
}
