use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print a value as pretty JSON on stdout.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Bold cyan section heading (human mode).
pub fn heading(title: &str) -> io::Result<()> {
    let mut out = stdout();
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{title}")?;
    out.reset()
}

/// `key: value` line with the key dimmed (human mode).
pub fn field(key: &str, value: &str) -> io::Result<()> {
    let mut out = stdout();
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, "{key}: ")?;
    out.reset()?;
    writeln!(out, "{value}")
}

/// Status marker: green `ok` or yellow `warn`.
pub fn status(ok: bool, label: &str, detail: &str) -> io::Result<()> {
    let mut out = stdout();
    let (color, tag) = if ok { (Color::Green, "ok  ") } else { (Color::Yellow, "warn") };
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{tag}")?;
    out.reset()?;
    writeln!(out, " {label:<22} {detail}")
}

/// Spinner on stderr; hidden in JSON mode.
pub fn spinner(msg: &str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
