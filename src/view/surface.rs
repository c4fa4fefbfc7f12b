//! Output surfaces the view worker can present a canvas on.
//!
//! The terminal surface queues one `MoveTo` + `Print` per row into a
//! pre-allocated byte buffer and flushes it in a single write, so a
//! frame never appears half-drawn.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::canvas::Canvas;

/// Destination for rendered frames.
pub trait Surface: Send + 'static {
    /// Present the canvas. Called once per received frame.
    fn present(&mut self, canvas: &Canvas) -> io::Result<()>;
}

/// Renders to stdout with crossterm.
pub struct TerminalSurface {
    output: Vec<u8>,
    stdout: Stdout,
}

impl TerminalSurface {
    /// Create a terminal surface writing to stdout.
    pub fn new() -> Self {
        Self {
            output: Vec::with_capacity(8192),
            stdout: io::stdout(),
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        self.output.clear();
        for (row, text) in canvas.rows().enumerate() {
            let Ok(y) = u16::try_from(row) else { break };
            queue!(self.output, MoveTo(0, y), Print(text))?;
        }
        self.stdout.write_all(&self.output)?;
        self.stdout.flush()
    }
}

/// Discards frames; used by tests and `--headless` runs.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    presented: u64,
}

impl Surface for HeadlessSurface {
    fn present(&mut self, _canvas: &Canvas) -> io::Result<()> {
        self.presented += 1;
        tracing::trace!(frames = self.presented, "headless frame presented");
        Ok(())
    }
}

/// RAII guard for the terminal state the renderer needs.
///
/// Enters raw mode, switches to the alternate screen and hides the
/// cursor; everything is restored on drop, including on panic unwind.
pub struct TerminalGuard(());

impl TerminalGuard {
    /// Take over the terminal.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self(()))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
