use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::config::{Config, ScreenKind};
use crate::counter::{CounterModel, FactService, FetchSettings};
use crate::observation::Scheduler;
use crate::ui::declarative::CounterView;
use crate::ui::imperative::CounterViewController;
use crate::ui::screen::{RenderContext, Screen};

/// Top-level UI state: both counter screens and which one is shown.
///
/// Each screen owns its own model and fetch task. Only the active screen
/// receives input and is drawn.
pub struct App {
    should_quit: bool,
    active: ScreenKind,
    declarative: CounterView,
    imperative: CounterViewController,
    service: Arc<dyn FactService>,
    frame: u64,
    size: Option<(u16, u16)>,
    force_redraw: bool,
}

impl App {
    pub fn new(
        config: &Config,
        scheduler: Arc<dyn Scheduler>,
        service: Arc<dyn FactService>,
    ) -> Self {
        let settings = FetchSettings::from_config(&config.facts, &config.ui);
        let declarative = CounterView::new(Arc::new(CounterModel::new(settings)));
        let mut imperative = CounterViewController::new(
            Arc::new(CounterModel::new(settings)),
            config.ui.fact_presentation,
        );
        imperative.view_did_load(scheduler);

        Self {
            should_quit: false,
            active: config.ui.start_screen,
            declarative,
            imperative,
            service,
            frame: 0,
            size: None,
            force_redraw: true,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn active(&self) -> ScreenKind {
        self.active
    }

    pub fn switch_screen(&mut self) {
        self.active = match self.active {
            ScreenKind::Declarative => ScreenKind::Imperative,
            ScreenKind::Imperative => ScreenKind::Declarative,
        };
        tracing::debug!(screen = ?self.active, "Switched screen");
        self.force_redraw = true;
    }

    pub fn declarative(&self) -> &CounterView {
        &self.declarative
    }

    pub fn imperative(&self) -> &CounterViewController {
        &self.imperative
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self.active {
            ScreenKind::Declarative => &mut self.declarative,
            ScreenKind::Imperative => &mut self.imperative,
        }
    }

    fn screen(&self) -> &dyn Screen {
        match self.active {
            ScreenKind::Declarative => &self.declarative,
            ScreenKind::Imperative => &self.imperative,
        }
    }

    /// Route a key to the active screen and run whatever it maps to.
    pub fn on_key(&mut self, key: &KeyEvent) {
        let service = Arc::clone(&self.service);
        let screen = self.screen_mut();
        if let Some(action) = screen.handle_key(key) {
            tracing::debug!(?action, "Counter action");
            screen.perform(action, &service);
        }
    }

    /// Esc: let the active screen dismiss what it presents.
    pub fn dismiss(&mut self) -> bool {
        self.screen_mut().dismiss()
    }

    pub fn on_tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.size = Some((cols, rows));
        self.force_redraw = true;
    }

    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    pub fn render_context(&self, now: Instant) -> RenderContext {
        RenderContext {
            now,
            frame: self.frame,
        }
    }

    pub fn needs_display(&self, now: Instant) -> bool {
        self.force_redraw || self.screen().needs_display(now)
    }

    /// Draw the active screen's body.
    pub fn render_screen(
        &mut self,
        frame: &mut ratatui::Frame<'_>,
        area: ratatui::layout::Rect,
        ctx: &RenderContext,
    ) {
        self.screen_mut().render(frame, area, ctx);
        self.force_redraw = false;
    }
}
