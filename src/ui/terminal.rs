//! Terminal lifecycle: raw mode, alternate screen, and restoring both on exit or panic.

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;

pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Enter raw mode and the alternate screen. Call [`restore`] on every exit path.
///
/// A failure after raw mode is on restores the terminal before returning.
pub fn init() -> std::io::Result<Tui> {
    enable_raw_mode()?;
    let mut out = BufWriter::new(stdout());
    let terminal = execute!(out, EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(out)));
    restore_on_error(terminal)
}

fn restore_on_error<T>(result: std::io::Result<T>) -> std::io::Result<T> {
    if result.is_err() {
        let _ = restore();
    }
    result
}

/// Leave the alternate screen and disable raw mode. Idempotent.
pub fn restore() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal before the default panic message prints.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn setup_error_is_returned_after_restoring() {
        let result: io::Result<()> = restore_on_error(Err(io::Error::other("no tty")));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "no tty");
    }

    #[test]
    fn successful_setup_passes_through() {
        assert_eq!(restore_on_error(Ok(7)).unwrap(), 7);
    }
}
