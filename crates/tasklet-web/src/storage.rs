use anyhow::anyhow;
use chrono::{
  NaiveDate,
  NaiveDateTime
};
use tasklet_shared::{
  Clock,
  KeyValueStore
};
use wasm_bindgen::JsValue;

/// `window.localStorage` as a
/// [`KeyValueStore`]. Looked up on every
/// call so a page without storage access
/// degrades per operation.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct LocalStorage;

impl LocalStorage {
  fn storage()
  -> anyhow::Result<web_sys::Storage> {
    web_sys::window()
      .ok_or_else(|| {
        anyhow!("no window object")
      })?
      .local_storage()
      .map_err(|err| {
        js_error("localStorage", err)
      })?
      .ok_or_else(|| {
        anyhow!(
          "localStorage is disabled"
        )
      })
  }
}

impl KeyValueStore for LocalStorage {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Self::storage()?
      .get_item(key)
      .map_err(|err| {
        js_error("getItem", err)
      })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    Self::storage()?
      .set_item(key, value)
      .map_err(|err| {
        js_error("setItem", err)
      })
  }

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    Self::storage()?
      .remove_item(key)
      .map_err(|err| {
        js_error("removeItem", err)
      })
  }
}

/// Reads `Date` so ids match
/// `Date.now()` and due dates compare in
/// the browser's zone.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct BrowserClock;

impl Clock for BrowserClock {
  fn now_millis(&self) -> u64 {
    let millis = js_sys::Date::now();
    if millis.is_finite() && millis > 0.0
    {
      millis as u64
    } else {
      0
    }
  }

  fn now_local(&self) -> NaiveDateTime {
    let now = js_sys::Date::new_0();
    let year =
      i32::try_from(now.get_full_year())
        .unwrap_or_default();

    NaiveDate::from_ymd_opt(
      year,
      now.get_month() + 1,
      now.get_date()
    )
    .and_then(|date| {
      date.and_hms_milli_opt(
        now.get_hours(),
        now.get_minutes(),
        now.get_seconds(),
        now.get_milliseconds()
      )
    })
    .unwrap_or_default()
  }
}

fn js_error(
  op: &str,
  err: JsValue
) -> anyhow::Error {
  anyhow!("{op} failed: {err:?}")
}
