use std::io::{self, IsTerminal, Write};

use tasklet_shared::{StatusFilter, TaskRow, ThemeMode};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

/// ANSI codes per theme; dark terminals get the bright variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    id: &'static str,
    overdue: &'static str,
    completed: &'static str,
    header: &'static str,
}

impl Palette {
    fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Light => Self {
                id: "34",
                overdue: "31",
                completed: "2;9",
                header: "1",
            },
            ThemeMode::Dark => Self {
                id: "93",
                overdue: "91",
                completed: "2;9",
                header: "1;97",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    force_color: bool,
    theme: ThemeMode,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            color: cfg.color()?,
            force_color: false,
            theme: ThemeMode::default(),
        })
    }

    /// Uncoloured output, light palette.
    pub fn plain() -> Self {
        Self {
            color: false,
            force_color: false,
            theme: ThemeMode::default(),
        }
    }

    /// Colour even when stdout is not a terminal.
    #[must_use]
    pub fn with_forced_color(mut self) -> Self {
        self.color = true;
        self.force_color = true;
        self
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn print_rows(
        &self,
        rows: &[TaskRow],
        filter: StatusFilter,
        search: &str,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_rows(&mut out, rows, filter, search)
    }

    /// Writes the whole view; every call replaces what was shown before.
    pub fn write_rows<W: Write>(
        &self,
        mut out: W,
        rows: &[TaskRow],
        filter: StatusFilter,
        search: &str,
    ) -> anyhow::Result<()> {
        let palette = Palette::for_theme(self.theme);

        let mut heading = format!("filter: {filter}");
        if !search.is_empty() {
            heading.push_str(&format!("  search: {search:?}"));
        }
        heading.push_str(&format!("  theme: {}", self.theme_badge()));
        writeln!(out, "{}", self.paint(&heading, palette.header))?;

        if rows.is_empty() {
            writeln!(out, "No tasks.")?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Status".to_string(),
            "Task".to_string(),
            "Actions".to_string(),
        ];

        let mut table = Vec::with_capacity(rows.len());
        for row in rows {
            let id = self.paint(&row.id.to_string(), palette.id);
            let status = if row.completed {
                "done"
            } else if row.overdue {
                "overdue"
            } else {
                "open"
            }
            .to_string();

            let label = if row.overdue {
                self.paint(&row.label, palette.overdue)
            } else if row.completed {
                self.paint(&row.label, palette.completed)
            } else {
                row.label.clone()
            };

            let actions = format!("[{}] [{}]", row.toggle_label, row.delete_label);
            table.push(vec![id, status, label, actions]);
        }

        write_table(&mut out, headers, table)?;
        Ok(())
    }

    pub fn theme_badge(&self) -> String {
        let icon = self.theme.icon();
        format!("{} {}", icon.glyph(), self.theme)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || (!self.force_color && !io::stdout().is_terminal()) {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (idx, header) in headers.iter().enumerate() {
        write!(writer, "{:width$} ", header, width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
