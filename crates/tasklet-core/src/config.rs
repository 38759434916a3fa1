use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use tracing::{
  debug,
  info,
  warn
};

pub const RC_ENV_VAR: &str = "TASKLETRC";
const RC_FILE_NAME: &str = ".taskletrc";
const DATA_DIR_NAME: &str = ".tasklet";
const MAX_INCLUDE_DEPTH: usize = 8;

pub const KEY_COLOR: &str = "color";
pub const KEY_DATA_LOCATION: &str =
  "data.location";
pub const KEY_DEFAULT_COMMAND: &str =
  "default.command";
pub const KEY_TIMEZONE: &str = "timezone";

/// Every key tasklet reads; anything
/// else in an rc file is reported and
/// dropped.
pub const KNOWN_KEYS: [&str; 4] = [
  KEY_COLOR,
  KEY_DATA_LOCATION,
  KEY_DEFAULT_COMMAND,
  KEY_TIMEZONE
];

#[derive(Debug, Clone)]
pub struct Config {
  values:           BTreeMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let values = [
      (
        KEY_DATA_LOCATION,
        format!("~/{DATA_DIR_NAME}")
      ),
      (
        KEY_DEFAULT_COMMAND,
        "list".to_string()
      ),
      (KEY_COLOR, "on".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Self {
      values,
      loaded_files: Vec::new()
    }
  }
}

/// One meaningful line of an rc file.
#[derive(Debug, PartialEq, Eq)]
enum RcLine<'a> {
  Include(&'a str),
  Entry(&'a str, &'a str)
}

impl Config {
  /// Defaults, then the rc file from
  /// `--taskletrc`, `$TASKLETRC` or
  /// `~/.taskletrc`.
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();
    match resolve_rc_path(rc_override) {
      | Some(path) => {
        info!(rc = %path.display(), "loading taskletrc");
        cfg.load_file(&path)?;
      }
      | None => {
        debug!("no taskletrc; defaults only")
      }
    }
    Ok(cfg)
  }

  /// Applies `rc.key=value` style
  /// overrides; the `rc.` prefix is
  /// optional.
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      let key = key
        .strip_prefix("rc.")
        .unwrap_or(&key)
        .to_string();
      self.set(&key, value, "override");
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  /// Entries in key order.
  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&str, &str)>
  {
    self
      .values
      .iter()
      .map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn color(
    &self
  ) -> anyhow::Result<bool> {
    let raw =
      self.get(KEY_COLOR).unwrap_or("on");
    parse_switch(raw).ok_or_else(|| {
      anyhow!(
        "invalid color setting: {raw}"
      )
    })
  }

  pub fn default_command(&self) -> &str {
    self
      .get(KEY_DEFAULT_COMMAND)
      .map(str::trim)
      .unwrap_or("list")
  }

  pub fn timezone(&self) -> Option<&str> {
    self
      .get(KEY_TIMEZONE)
      .map(str::trim)
      .filter(|tz| !tz.is_empty())
  }

  /// Reads `path`, following `include`
  /// lines relative to the including
  /// file.
  #[tracing::instrument(skip(self))]
  pub fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    self.load_nested(path, 0)
  }

  fn load_nested(
    &mut self,
    path: &Path,
    depth: usize
  ) -> anyhow::Result<()> {
    if depth > MAX_INCLUDE_DEPTH {
      bail!(
        "includes nested deeper than \
         {MAX_INCLUDE_DEPTH} at {}",
        path.display()
      );
    }

    let path = expand_tilde(
      &path.to_string_lossy()
    );
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    self.loaded_files.push(path.clone());

    for (idx, raw) in
      text.lines().enumerate()
    {
      let origin = format!(
        "{}:{}",
        path.display(),
        idx + 1
      );
      let parsed = parse_rc_line(raw)
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {origin}: {raw}"
          )
        })?;

      match parsed {
        | None => {}
        | Some(RcLine::Entry(key, value)) => {
          self.set(
            key,
            value.to_string(),
            &origin
          );
        }
        | Some(RcLine::Include(target)) => {
          let mut target =
            expand_tilde(target);
          if target.is_relative()
            && let Some(dir) = path.parent()
          {
            target = dir.join(target);
          }
          if target.exists() {
            self.load_nested(
              &target,
              depth + 1
            )?;
          } else {
            warn!(
              include = %target.display(),
              at = %origin,
              "include file does not exist; skipping"
            );
          }
        }
      }
    }

    Ok(())
  }

  fn set(
    &mut self,
    key: &str,
    value: String,
    origin: &str
  ) {
    if !KNOWN_KEYS.contains(&key) {
      warn!(
        key,
        origin,
        "ignoring unknown config key"
      );
      return;
    }
    debug!(key, value = %value, origin, "config value set");
    self.values.insert(key.to_string(), value);
  }
}

/// `None` for a malformed line,
/// `Some(None)` for blank and
/// comment-only ones.
fn parse_rc_line(
  raw: &str
) -> Option<Option<RcLine<'_>>> {
  let line = raw
    .split_once('#')
    .map_or(raw, |(before, _)| before)
    .trim();

  if line.is_empty() {
    return Some(None);
  }
  if let Some(target) =
    line.strip_prefix("include ")
  {
    let target = target.trim();
    return (!target.is_empty())
      .then_some(Some(RcLine::Include(
        target
      )));
  }

  let (key, value) = line.split_once('=')?;
  let key = key.trim();
  (!key.is_empty()).then_some(Some(
    RcLine::Entry(key, value.trim())
  ))
}

/// The data directory: `--data`, else
/// `data.location`, else `~/.tasklet`.
/// Created when missing.
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = match override_dir {
    | Some(dir) => dir.to_path_buf(),
    | None => {
      match cfg.get(KEY_DATA_LOCATION) {
        | Some(raw) => expand_tilde(raw),
        | None => dirs::home_dir()
          .ok_or_else(|| {
            anyhow!(
              "cannot determine home \
               directory"
            )
          })?
          .join(DATA_DIR_NAME)
      }
    }
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }
  Ok(dir)
}

fn resolve_rc_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }
  if let Ok(env) =
    std::env::var(RC_ENV_VAR)
  {
    return (env != "/dev/null")
      .then(|| PathBuf::from(env));
  }
  dirs::home_dir()
    .map(|home| home.join(RC_FILE_NAME))
    .filter(|path| path.exists())
}

fn expand_tilde(raw: &str) -> PathBuf {
  match (
    raw.strip_prefix("~/"),
    dirs::home_dir()
  ) {
    | (Some(rest), Some(home)) => {
      home.join(rest)
    }
    | _ => PathBuf::from(raw)
  }
}

fn parse_switch(raw: &str) -> Option<bool> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "on" | "yes" | "true" | "1" => {
      Some(true)
    }
    | "off" | "no" | "false" | "0" => {
      Some(false)
    }
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::{
    Config,
    RcLine,
    parse_rc_line
  };

  #[test]
  fn defaults_cover_known_keys() {
    let cfg = Config::default();
    assert_eq!(cfg.default_command(), "list");
    assert!(cfg.color().expect("color"));
    assert_eq!(cfg.timezone(), None);
  }

  #[test]
  fn rc_lines_parse_entries_includes_and_comments()
  {
    assert_eq!(
      parse_rc_line("color = off # plain"),
      Some(Some(RcLine::Entry(
        "color", "off"
      )))
    );
    assert_eq!(
      parse_rc_line("  # only a note"),
      Some(None)
    );
    assert_eq!(
      parse_rc_line("include extra.rc"),
      Some(Some(RcLine::Include(
        "extra.rc"
      )))
    );
    assert_eq!(parse_rc_line("color on"), None);
    assert_eq!(parse_rc_line("= off"), None);
  }

  #[test]
  fn loads_file_with_comments_and_includes()
  {
    let temp = tempdir().expect("tempdir");
    fs::write(
      temp.path().join("extra.rc"),
      "timezone = UTC\n"
    )
    .expect("write include");
    let rc = temp.path().join("main.rc");
    fs::write(
      &rc,
      "# tasklet settings\n\
       color = off # plain output\n\
       \n\
       include extra.rc\n\
       include missing.rc\n"
    )
    .expect("write rc");

    let mut cfg = Config::default();
    cfg.load_file(&rc).expect("load rc");

    assert!(!cfg.color().expect("color"));
    assert_eq!(cfg.timezone(), Some("UTC"));
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn unknown_keys_are_dropped() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("main.rc");
    fs::write(
      &rc,
      "urgency.coefficient = 4\ncolor = no\n"
    )
    .expect("write rc");

    let mut cfg = Config::default();
    cfg.load_file(&rc).expect("load rc");
    assert_eq!(
      cfg.get("urgency.coefficient"),
      None
    );
    assert!(!cfg.color().expect("color"));
  }

  #[test]
  fn self_include_is_cut_off() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("loop.rc");
    fs::write(&rc, "include loop.rc\n")
      .expect("write rc");

    let err = Config::default()
      .load_file(&rc)
      .expect_err("include loop");
    assert!(
      format!("{err:#}").contains("nested")
    );
  }

  #[test]
  fn rejects_lines_without_equals() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("bad.rc");
    fs::write(&rc, "color on\n")
      .expect("write rc");

    let err = Config::default()
      .load_file(&rc)
      .expect_err("invalid line");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides([
      (
        "rc.default.command".to_string(),
        "shell".to_string()
      ),
      (
        "color".to_string(),
        "sometimes".to_string()
      ),
    ]);
    assert_eq!(cfg.default_command(), "shell");
    assert!(cfg.color().is_err());
  }
}
