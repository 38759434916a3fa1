use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

/// Glyph shown on the theme toggle:
/// the moon invites switching to dark,
/// the sun back to light.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ThemeIcon {
  Moon,
  Sun
}

impl ThemeIcon {
  pub fn glyph(self) -> &'static str {
    match self {
      | Self::Moon => "\u{263e}",
      | Self::Sun => "\u{2600}"
    }
  }

  pub fn color(self) -> &'static str {
    match self {
      | Self::Moon => "darkblue",
      | Self::Sun => "#EFFD5F"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ThemeMode {
  #[default]
  Light,
  Dark
}

impl ThemeMode {
  #[must_use]
  pub fn toggle(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn body_class(
    self
  ) -> Option<&'static str> {
    match self {
      | Self::Light => None,
      | Self::Dark => Some("dark")
    }
  }

  pub fn icon(self) -> ThemeIcon {
    match self {
      | Self::Light => ThemeIcon::Moon,
      | Self::Dark => ThemeIcon::Sun
    }
  }

  pub fn toggle_background(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "#f4f4f9",
      | Self::Dark => "#333"
    }
  }
}

impl fmt::Display for ThemeMode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ThemeMode {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str()
    {
      | "light" | "day" => Ok(Self::Light),
      | "dark" | "night" => Ok(Self::Dark),
      | other => Err(anyhow!(
        "unknown theme: {other}"
      ))
    }
  }
}
