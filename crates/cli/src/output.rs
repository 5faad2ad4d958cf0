//! Terminal rendering for depcache commands.
//!
//! Text mode writes a headline, indented `label: value` fields and path
//! lists. `-o json` writes one pretty-printed document to stdout instead.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// How a headline reads. Failures and warnings go to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Done,
  Note,
  Warn,
  Fail,
}

impl Tone {
  fn glyph(self) -> &'static str {
    match self {
      Tone::Done => "✓",
      Tone::Note => "•",
      Tone::Warn => "⚠",
      Tone::Fail => "✗",
    }
  }
}

pub fn headline(tone: Tone, message: &str) {
  let glyph = tone.glyph();
  match tone {
    Tone::Done => println!("{} {}", glyph.if_supports_color(Stream::Stdout, |s| s.green()), message),
    Tone::Note => println!("{} {}", glyph.if_supports_color(Stream::Stdout, |s| s.blue()), message),
    Tone::Warn => eprintln!(
      "{} {}",
      glyph.if_supports_color(Stream::Stderr, |s| s.yellow()),
      message.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
    Tone::Fail => eprintln!(
      "{} {}",
      glyph.if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
  }
}

/// An indented `label: value` line under a headline.
pub fn field(label: &str, value: impl Display) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

/// One path per line, as stored in artifacts.
pub fn path_list(paths: &[PathBuf], indent: usize) {
  for path in paths {
    println!("{:indent$}{}", "", path.display(), indent = indent);
  }
}

/// `path` relative to `root` when it lies underneath, unchanged otherwise.
pub fn project_relative(root: &Path, path: &Path) -> PathBuf {
  path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}

/// `1 source`, `3 sources`.
pub fn plural(count: usize, noun: &str) -> String {
  let suffix = if count == 1 { "" } else { "s" };
  format!("{} {}{}", count, noun, suffix)
}

/// Byte count in binary units, e.g. `1.5 KB`.
pub fn size(bytes: u64) -> String {
  let units = ["B", "KB", "MB", "GB"];
  let mut value = bytes as f64;
  let mut unit = 0;
  while value >= 1024.0 && unit < units.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  if unit == 0 {
    format!("{} B", bytes)
  } else {
    format!("{:.1} {}", value, units[unit])
  }
}

pub fn elapsed(duration: Duration) -> String {
  if duration < Duration::from_secs(1) {
    format!("{}ms", duration.as_millis())
  } else {
    format!("{:.2}s", duration.as_secs_f64())
  }
}

pub fn emit_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?;
  println!("{}", json);
  Ok(())
}
