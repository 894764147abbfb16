//! Scoped ownership of the terminal for a pager session.
//!
//! Raw mode, the alternate screen and mouse capture are released when the
//! guard drops, when a panic unwinds through the session, and the event
//! loop polls [`TerminalGuard::interrupted`] so termination signals end the
//! session through the same path. Dropping the guard also reinstates the
//! previous panic hook and the default signal actions.

use std::io::{self, Stdout};
use std::os::raw::c_int;
use std::panic::{self, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
#[cfg(unix)]
use signal_hook::consts::SIGHUP;
use signal_hook::consts::{SIGINT, SIGTERM};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;
type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

#[cfg(unix)]
const TERM_SIGNALS: [c_int; 3] = [SIGTERM, SIGHUP, SIGINT];
#[cfg(not(unix))]
const TERM_SIGNALS: [c_int; 2] = [SIGTERM, SIGINT];

pub struct TerminalGuard {
    cleanup: Arc<Mutex<Option<Cleanup>>>,
    previous_hook: Arc<Mutex<Option<PanicHook>>>,
    interrupted: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
    signals: Vec<signal_hook::SigId>,
}

impl TerminalGuard {
    fn new() -> Self {
        Self {
            cleanup: Arc::new(Mutex::new(None)),
            previous_hook: Arc::new(Mutex::new(None)),
            interrupted: Arc::new(AtomicBool::new(false)),
            released: Arc::new(AtomicBool::new(false)),
            signals: Vec::new(),
        }
    }

    fn set_cleanup<F: FnOnce() + Send + 'static>(&self, cleanup: F) {
        if let Ok(mut slot) = self.cleanup.lock() {
            *slot = Some(Box::new(cleanup));
        }
    }

    fn install_panic_hook(&self) {
        if let Ok(mut slot) = self.previous_hook.lock() {
            *slot = Some(panic::take_hook());
        }
        let cleanup = Arc::clone(&self.cleanup);
        let previous = Arc::clone(&self.previous_hook);
        panic::set_hook(Box::new(move |info| {
            if let Ok(mut slot) = cleanup.lock() {
                if let Some(cleanup) = slot.take() {
                    cleanup();
                }
            }
            if let Ok(slot) = previous.lock() {
                if let Some(hook) = slot.as_ref() {
                    hook(info);
                }
            }
        }));
    }

    /// Puts back the hook that was active before the session.
    fn restore_panic_hook(&self) {
        // Swapping hooks while unwinding aborts the process.
        if std::thread::panicking() {
            return;
        }
        let previous = self.previous_hook.lock().ok().and_then(|mut slot| slot.take());
        if let Some(hook) = previous {
            drop(panic::take_hook());
            panic::set_hook(hook);
        }
    }

    /// Termination signals only raise [`Self::interrupted`] while the
    /// session runs. The conditional defaults stay registered after the
    /// guard drops and give each signal its default action back, which
    /// unregistering the flags alone would not.
    fn watch_signals(&mut self) -> io::Result<()> {
        for signal in TERM_SIGNALS {
            signal_hook::flag::register_conditional_default(signal, Arc::clone(&self.released))?;
            let id = signal_hook::flag::register(signal, Arc::clone(&self.interrupted))?;
            self.signals.push(id);
        }
        Ok(())
    }

    /// True once a termination signal has arrived.
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    fn restore(&self) {
        if let Ok(mut slot) = self.cleanup.lock() {
            if let Some(cleanup) = slot.take() {
                cleanup();
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
        self.restore_panic_hook();
        for id in self.signals.drain(..) {
            signal_hook::low_level::unregister(id);
        }
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Take over the terminal. The guard must outlive the returned terminal's use.
pub fn setup_terminal(mouse: bool) -> io::Result<(Tui, TerminalGuard)> {
    let mut guard = TerminalGuard::new();
    guard.set_cleanup(move || {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        if mouse {
            let _ = stdout.execute(DisableMouseCapture);
        }
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    });
    guard.install_panic_hook();
    guard.watch_signals()?;

    // Anything failing from here on is undone by the guard's drop.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    if mouse {
        stdout.execute(EnableMouseCapture)?;
    }
    stdout.execute(Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok((terminal, guard))
}
