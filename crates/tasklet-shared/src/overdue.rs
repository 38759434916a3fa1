use chrono::{
  NaiveDate,
  NaiveDateTime,
  NaiveTime
};
use tracing::trace;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] =
  ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

/// Combines a `YYYY-MM-DD` date and an
/// `HH:MM[:SS[.fff]]` time. Either part empty
/// or malformed yields `None`.
pub fn due_instant(
  due_date: &str,
  due_time: &str
) -> Option<NaiveDateTime> {
  let date = due_date.trim();
  let time = due_time.trim();
  if date.is_empty() || time.is_empty() {
    return None;
  }

  let Ok(date) =
    NaiveDate::parse_from_str(
      date,
      DATE_FORMAT
    )
  else {
    trace!(date, "unparsable due date");
    return None;
  };

  let Some(time) =
    TIME_FORMATS.iter().find_map(|fmt| {
      NaiveTime::parse_from_str(time, fmt)
        .ok()
    })
  else {
    trace!(time, "unparsable due time");
    return None;
  };

  Some(date.and_time(time))
}

/// True only when both due fields are
/// set and their instant is strictly
/// before `now`.
pub fn is_overdue(
  due_date: &str,
  due_time: &str,
  now: NaiveDateTime
) -> bool {
  due_instant(due_date, due_time)
    .is_some_and(|due| due < now)
}
