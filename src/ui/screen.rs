//! Pieces shared by both counter screens.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::Frame;
use tokio::task::JoinHandle;

use crate::counter::{CounterModel, FactService};

/// Spinner animation frames.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Button and shortcut actions on the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Decrement,
    Increment,
    FetchFact,
}

impl CounterAction {
    pub fn title(self) -> &'static str {
        match self {
            CounterAction::Decrement => "Decrement",
            CounterAction::Increment => "Increment",
            CounterAction::FetchFact => "Get fact",
        }
    }

    /// Shortcut keys that trigger an action directly.
    pub fn from_shortcut(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => Some(CounterAction::Increment),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(CounterAction::Decrement),
            KeyCode::Char('f') | KeyCode::Char('F') => Some(CounterAction::FetchFact),
            _ => None,
        }
    }
}

/// Per-frame inputs to rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: Instant,
    pub frame: u64,
}

impl RenderContext {
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.frame as usize / 3) % SPINNER_FRAMES.len()]
    }
}

/// A counter screen hosted by the app.
pub trait Screen {
    /// Translate a key into an action, updating focus as needed.
    fn handle_key(&mut self, key: &KeyEvent) -> Option<CounterAction>;

    /// Run an action against this screen's model.
    fn perform(&mut self, action: CounterAction, service: &Arc<dyn FactService>);

    /// Handle Esc. Returns true if the screen consumed it.
    fn dismiss(&mut self) -> bool {
        false
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &RenderContext);

    fn needs_display(&self, now: Instant) -> bool;
}

/// Run `action` against `model`, starting fetches on `fetch`.
pub fn perform_action(
    model: &Arc<CounterModel>,
    action: CounterAction,
    service: &Arc<dyn FactService>,
    fetch: &mut FetchTask,
) {
    match action {
        CounterAction::Decrement => model.decrement(),
        CounterAction::Increment => model.increment(),
        CounterAction::FetchFact => fetch.start(Arc::clone(model), Arc::clone(service)),
    }
}

/// The in-flight fetch started by a screen.
///
/// Starting a new fetch aborts the previous task, and dropping the owner
/// aborts whatever is still running.
#[derive(Default)]
pub struct FetchTask {
    handle: Option<JoinHandle<()>>,
}

impl FetchTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, model: Arc<CounterModel>, service: Arc<dyn FactService>) {
        self.abort();
        self.handle = Some(tokio::spawn(async move {
            let outcome = model.fetch_fact(service.as_ref()).await;
            tracing::debug!(?outcome, "Fetch finished");
        }));
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Move `focus` by `delta` over `len` slots, wrapping.
pub fn move_focus(focus: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (focus as isize + delta).rem_euclid(len as isize) as usize
}
