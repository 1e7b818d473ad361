//! vtkit probe - query the attached terminal
//!
//! Runs every supported query against the terminal on standard input,
//! prints the results as JSON, then demonstrates styled and markup
//! output. Useful for checking what a terminal emulator actually
//! implements.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use serde::Serialize;

use vtkit::ansi::{Foreground, Style};
use vtkit::{CursorPosition, RgbColor, Terminal, TtyError, WindowSize};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Everything the probe learned about the terminal
#[derive(Debug, Default, Serialize)]
struct ProbeReport {
    cursor_position: Option<CursorPosition>,
    size: Option<WindowSize>,
    foreground_color: Option<RgbColor>,
    background_color: Option<RgbColor>,
    dark_background: Option<bool>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut timeout = Duration::from_millis(500);
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-t" | "--timeout-ms" => {
                if let Some(value) = args.next() {
                    timeout = Duration::from_millis(value.parse().unwrap_or(500));
                }
            }
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
    }

    match run(timeout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("probe failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = Terminal::stdout().with_timeout(timeout);
    let mut report = ProbeReport::default();

    report.cursor_position = soft(terminal.cursor_position())?;
    report.size = soft(terminal.size())?;
    report.foreground_color = soft(terminal.foreground_color())?;
    report.background_color = soft(terminal.background_color())?;
    report.dark_background = soft(terminal.is_dark_background())?;

    terminal.print("")?;
    terminal.print(&serde_json::to_string_pretty(&report)?)?;
    terminal.print("")?;

    terminal.print_styled("styled output", [Foreground::Red])?;
    terminal.print_styled("bold styled output", [Style::Bold as u8, Foreground::Green as u8])?;
    terminal.print_markup("markup: <red>red</> <green>green</> <bold>bold</>")?;
    terminal.flush()?;

    Ok(())
}

/// Per-query failures that just mean "this terminal can't answer"
/// degrade to an empty field; anything else aborts the probe.
fn soft<T>(result: Result<Option<T>, TtyError>) -> Result<Option<T>, TtyError> {
    match result {
        Ok(value) => Ok(value),
        Err(TtyError::Timeout(after)) => {
            tracing::warn!("query timed out after {after:?}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_help() {
    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "vtkit-probe - query the attached terminal");
    let _ = writeln!(stdout);
    let _ = writeln!(stdout, "Usage: vtkit-probe [options]");
    let _ = writeln!(stdout, "  -t, --timeout-ms <ms>   query reply timeout (default 500)");
    let _ = writeln!(stdout, "  -h, --help              show this help");
}
