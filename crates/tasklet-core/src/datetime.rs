use anyhow::anyhow;
use chrono::{
  Local,
  NaiveDateTime,
  Utc
};
use chrono_tz::Tz;
use tasklet_shared::Clock;
use tracing::debug;

use crate::config::Config;

const TIMEZONE_ENV_VAR: &str =
  "TASKLET_TIMEZONE";

/// Wall clock read from the system;
/// due dates are compared in `tz` when
/// one is configured, otherwise in the
/// machine's local zone.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct SystemClock {
  tz: Option<Tz>
}

impl SystemClock {
  pub fn new(tz: Option<Tz>) -> Self {
    Self { tz }
  }

  pub fn from_config(
    cfg: &Config
  ) -> anyhow::Result<Self> {
    Ok(Self::new(resolve_timezone(cfg)?))
  }

  pub fn timezone(&self) -> Option<Tz> {
    self.tz
  }
}

impl Clock for SystemClock {
  fn now_millis(&self) -> u64 {
    u64::try_from(
      Utc::now().timestamp_millis()
    )
    .unwrap_or(0)
  }

  fn now_local(&self) -> NaiveDateTime {
    match self.tz {
      | Some(tz) => {
        Utc::now()
          .with_timezone(&tz)
          .naive_local()
      }
      | None => Local::now().naive_local()
    }
  }
}

/// `TASKLET_TIMEZONE` wins over the
/// `timezone` config key; neither set
/// means system local time.
pub fn resolve_timezone(
  cfg: &Config
) -> anyhow::Result<Option<Tz>> {
  let raw = std::env::var(
    TIMEZONE_ENV_VAR
  )
  .ok()
  .or_else(|| {
    cfg.timezone().map(str::to_string)
  });

  let Some(raw) = raw else {
    return Ok(None);
  };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }

  let tz =
    parse_timezone(trimmed)?;
  debug!(timezone = %tz, "using configured timezone");
  Ok(Some(tz))
}

pub fn parse_timezone(
  raw: &str
) -> anyhow::Result<Tz> {
  raw.parse::<Tz>().map_err(|err| {
    anyhow!(
      "invalid timezone {raw:?}: {err}"
    )
  })
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };
  use chrono_tz::Tz;

  use super::parse_timezone;

  #[test]
  fn parses_iana_names() {
    let tz = parse_timezone(
      "America/Mexico_City"
    )
    .expect("parse timezone");
    assert_eq!(
      tz,
      Tz::America__Mexico_City
    );
    assert!(
      parse_timezone("Mars/Olympus")
        .is_err()
    );
  }

  #[test]
  fn configured_zone_shifts_wall_clock() {
    let tz = parse_timezone("Asia/Tokyo")
      .expect("parse timezone");
    let instant = Utc
      .with_ymd_and_hms(
        2024, 1, 1, 0, 0, 0
      )
      .single()
      .expect("valid instant");
    assert_eq!(
      instant
        .with_timezone(&tz)
        .naive_local()
        .format("%Y-%m-%d %H:%M")
        .to_string(),
      "2024-01-01 09:00"
    );
  }
}
