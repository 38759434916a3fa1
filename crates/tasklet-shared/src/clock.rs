use chrono::NaiveDateTime;

/// Source of "now" for id generation
/// and overdue checks.
pub trait Clock {
  /// Milliseconds since the Unix
  /// epoch.
  fn now_millis(&self) -> u64;

  /// Wall-clock time in the zone due
  /// dates are written in.
  fn now_local(&self) -> NaiveDateTime;
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct FixedClock {
  pub at: NaiveDateTime
}

impl FixedClock {
  pub fn new(at: NaiveDateTime) -> Self {
    Self { at }
  }
}

impl Clock for FixedClock {
  fn now_millis(&self) -> u64 {
    u64::try_from(
      self.at.and_utc().timestamp_millis()
    )
    .unwrap_or(0)
  }

  fn now_local(&self) -> NaiveDateTime {
    self.at
  }
}

impl<C: Clock + ?Sized> Clock for &C {
  fn now_millis(&self) -> u64 {
    (**self).now_millis()
  }

  fn now_local(&self) -> NaiveDateTime {
    (**self).now_local()
  }
}
