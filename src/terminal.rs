//! Terminal control for the picker
//!
//! The `Terminal` trait is the seam for interactivity checks and raw mode;
//! `CrosstermTerminal` drives the real tty. Control sequences are built as
//! strings so a whole frame goes out in one write.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use crossterm::cursor;
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;

use crate::render::FrameSink;

/// Carriage return + newline (raw mode does not translate `\n`)
pub const CRLF: &str = "\r\n";

/// Clear screen
pub fn clear_screen() -> String {
    let mut buf = String::new();
    let _ = Clear(ClearType::All).write_ansi(&mut buf);
    buf
}

/// Move cursor to absolute position (0-indexed)
pub fn move_to(row: u16, col: u16) -> String {
    let mut buf = String::new();
    let _ = cursor::MoveTo(col, row).write_ansi(&mut buf);
    buf
}

pub fn hide_cursor() -> String {
    let mut buf = String::new();
    let _ = cursor::Hide.write_ansi(&mut buf);
    buf
}

pub fn show_cursor() -> String {
    let mut buf = String::new();
    let _ = cursor::Show.write_ansi(&mut buf);
    buf
}

/// Terminal the picker runs on
pub trait Terminal: Send + Sync {
    /// Whether a user can type into this terminal
    fn is_interactive(&self) -> bool;

    /// Enter raw mode and hide the cursor
    fn enter_raw_mode(&self) -> io::Result<()>;

    /// Undo `enter_raw_mode`
    fn leave_raw_mode(&self) -> io::Result<()>;
}

/// The process's own stdin/stdout tty
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermTerminal;

impl Terminal for CrosstermTerminal {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }

    fn enter_raw_mode(&self) -> io::Result<()> {
        enter_with(
            &mut io::stdout(),
            crossterm::terminal::enable_raw_mode,
            crossterm::terminal::disable_raw_mode,
        )
    }

    fn leave_raw_mode(&self) -> io::Result<()> {
        leave_with(&mut io::stdout(), crossterm::terminal::disable_raw_mode)
    }
}

/// Enable raw mode, then hide the cursor on `out`
///
/// Raw mode is switched back off if the cursor cannot be hidden.
fn enter_with<W: Write>(
    out: &mut W,
    enable: impl FnOnce() -> io::Result<()>,
    disable: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable()?;
    let hidden = out
        .write_all(hide_cursor().as_bytes())
        .and_then(|()| out.flush());
    if let Err(e) = hidden {
        if let Err(undo) = disable() {
            tracing::warn!("failed to leave raw mode after setup error: {}", undo);
        }
        return Err(e);
    }
    Ok(())
}

/// Show the cursor on `out`, then disable raw mode
///
/// Raw mode is always disabled; the first error wins.
fn leave_with<W: Write>(out: &mut W, disable: impl FnOnce() -> io::Result<()>) -> io::Result<()> {
    let shown = out
        .write_all(show_cursor().as_bytes())
        .and_then(|()| out.write_all(CRLF.as_bytes()))
        .and_then(|()| out.flush());
    let disabled = disable();
    shown.and(disabled)
}

/// Raw mode held for the lifetime of the guard
///
/// Released exactly once, on drop.
pub struct RawModeGuard {
    terminal: Arc<dyn Terminal>,
}

impl RawModeGuard {
    pub fn acquire(terminal: Arc<dyn Terminal>) -> io::Result<Self> {
        terminal.enter_raw_mode()?;
        tracing::debug!("raw mode enabled");
        Ok(Self { terminal })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match self.terminal.leave_raw_mode() {
            Ok(()) => tracing::debug!("raw mode disabled"),
            Err(e) => tracing::warn!("failed to restore terminal: {}", e),
        }
    }
}

/// Paints each frame over the whole screen
#[derive(Debug, Default)]
pub struct StdoutSink;

impl FrameSink for StdoutSink {
    fn render(&mut self, frame: &str) -> io::Result<()> {
        let mut out = String::with_capacity(frame.len() + 16);
        out.push_str(&clear_screen());
        out.push_str(&move_to(0, 0));
        out.push_str(frame);

        let mut stdout = io::stdout().lock();
        stdout.write_all(out.as_bytes())?;
        stdout.flush()
    }
}
