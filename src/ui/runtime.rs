use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::counter::FactService;
use crate::observation::ChannelScheduler;
use crate::shutdown::{wait_for_signal, ShutdownCoordinator};
use crate::ui::app::App;
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::input::handle_key;
use crate::ui::render::draw;
use crate::ui::terminal_guard::setup_terminal;

/// Run the TUI until the user quits or a signal arrives.
///
/// Must be called on the runtime that will also run fetch tasks and
/// deferred re-renders; the binary uses a current-thread runtime.
pub async fn run(config: Config, service: Arc<dyn FactService>) -> io::Result<()> {
    let shutdown = ShutdownCoordinator::new();
    let signal_handle = shutdown.handle();
    tokio::spawn(async move {
        let reason = wait_for_signal().await;
        signal_handle.signal(reason);
    });

    let (scheduler, mut jobs) = ChannelScheduler::channel();
    let (mut terminal, guard) = setup_terminal()?;
    let mut app = App::new(&config, Arc::new(scheduler), service);
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        app.on_resize(cols, rows);
    }
    let mut events = EventHandler::new(shutdown.handle());

    let mut frames = tokio::time::interval(Duration::from_millis(config.ui.frame_rate_ms));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let stop = shutdown.handle();

    tracing::info!(screen = ?app.active(), "UI started");
    loop {
        if app.needs_display(Instant::now()) {
            terminal.draw(|frame| draw(frame, &mut app))?;
        }
        if app.should_quit() {
            break;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(AppEvent::Key(key)) => handle_key(&mut app, key),
                Some(AppEvent::Resize(cols, rows)) => app.on_resize(cols, rows),
                None => break,
            },
            Some(job) = jobs.recv() => job.run(),
            _ = frames.tick() => app.on_tick(),
            _ = stop.wait() => break,
        }
    }

    shutdown.signal("ui exited");
    drop(app);
    drop(guard);
    Ok(())
}
