use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::shutdown::ShutdownHandle;

/// How often the input thread re-checks the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Terminal input read on a dedicated thread and forwarded to the UI loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(shutdown: ShutdownHandle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || loop {
            if shutdown.is_shutting_down() || tx.is_closed() {
                break;
            }

            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    tracing::error!(error = %err, "Failed to poll terminal input");
                    break;
                }
            }

            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(AppEvent::Key(key))
                }
                Ok(Event::Resize(cols, rows)) => tx.send(AppEvent::Resize(cols, rows)),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(error = %err, "Failed to read terminal input");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Next input event; `None` once the input thread has stopped.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}
