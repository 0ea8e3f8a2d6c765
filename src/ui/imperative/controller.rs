//! Imperative counter screen.
//!
//! Widgets are built once in [`CounterViewController::view_did_load`]. A
//! single observation then copies model state onto them whenever something
//! it read changes, so there is one place that knows how state maps to
//! widgets.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::config::FactPresentation;
use crate::counter::{CounterModel, FactService};
use crate::navigation::{Presentation, Presenter};
use crate::observation::{observe_animated, Animation, ObservationHandle, Scheduler};
use crate::ui::screen::{
    move_focus, perform_action, CounterAction, FetchTask, RenderContext, Screen,
};

use super::fact_sheet::FactSheet;
use super::widgets::CounterStack;

/// Widget state shared between the observation and drawing.
struct ViewState {
    stack: CounterStack,
    sheet: Presenter<FactSheet>,
    dirty: bool,
}

pub struct CounterViewController {
    model: Arc<CounterModel>,
    presentation: FactPresentation,
    view: Arc<Mutex<ViewState>>,
    observation: Option<ObservationHandle>,
    fetch: FetchTask,
    focus: usize,
}

impl CounterViewController {
    pub fn new(model: Arc<CounterModel>, presentation: FactPresentation) -> Self {
        Self {
            model,
            presentation,
            view: Arc::new(Mutex::new(ViewState {
                stack: CounterStack::new(Instant::now()),
                sheet: Presenter::new(),
                dirty: true,
            })),
            observation: None,
            fetch: FetchTask::new(),
            focus: 0,
        }
    }

    pub fn model(&self) -> &Arc<CounterModel> {
        &self.model
    }

    pub fn is_loaded(&self) -> bool {
        self.observation.is_some()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Start observing the model. Calling it again is a no-op.
    pub fn view_did_load(&mut self, scheduler: Arc<dyn Scheduler>) {
        if self.observation.is_some() {
            return;
        }
        let model = Arc::clone(&self.model);
        let view = Arc::clone(&self.view);
        let presentation = self.presentation;
        self.observation = Some(observe_animated(scheduler, move |animation| {
            update_view(&model, &mut view.lock(), presentation, animation);
        }));
    }

    /// Number of times the observation has copied state onto the widgets.
    pub fn update_count(&self) -> u64 {
        self.observation.as_ref().map_or(0, ObservationHandle::runs)
    }

    pub fn count_text(&self) -> String {
        self.view.lock().stack.count_label.text.clone()
    }

    pub fn fact_text(&self) -> Option<String> {
        let view = self.view.lock();
        match self.presentation {
            FactPresentation::Inline => {
                let label = &view.stack.fact_label;
                (!label.hidden && label.alpha.target() > 0.0).then(|| label.text.clone())
            }
            FactPresentation::Sheet => view.sheet.presented().map(|s| s.fact().text().to_string()),
        }
    }

    pub fn is_indicator_visible(&self) -> bool {
        !self.view.lock().stack.indicator.hidden
    }

    pub fn buttons_enabled(&self) -> bool {
        self.view.lock().stack.buttons().iter().all(|b| b.enabled)
    }

    fn focused_action(&self) -> Option<CounterAction> {
        let view = self.view.lock();
        view.stack
            .buttons()
            .get(self.focus)
            .filter(|button| button.enabled)
            .map(|button| button.action)
    }

    fn action_enabled(&self, action: CounterAction) -> bool {
        let view = self.view.lock();
        view.stack
            .buttons()
            .iter()
            .any(|button| button.action == action && button.enabled)
    }
}

fn update_view(
    model: &CounterModel,
    view: &mut ViewState,
    presentation: FactPresentation,
    animation: Option<Animation>,
) {
    let now = Instant::now();
    let count = model.count();
    let fact = model.fact();
    let loading = model.fact_is_loading();

    view.stack.count_label.text = count.to_string();
    view.stack.indicator.hidden = !loading;
    view.stack.set_buttons_enabled(!loading);

    match presentation {
        FactPresentation::Inline => {
            let fade = Some(animation.unwrap_or_default());
            let label = &mut view.stack.fact_label;
            match fact {
                Some(fact) => {
                    label.text = fact.text().to_string();
                    label.hidden = false;
                    label.alpha.animate_to(1.0, fade, now);
                }
                None => label.alpha.animate_to(0.0, fade, now),
            }
            view.stack.settle(now);
        }
        FactPresentation::Sheet => {
            let result = view
                .sheet
                .present(fact, |fact| FactSheet::new(fact, animation, now));
            if result != Presentation::Unchanged {
                tracing::debug!(?result, "Fact sheet");
            }
        }
    }

    view.dirty = true;
}

impl Screen for CounterViewController {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<CounterAction> {
        let mark_dirty = |view: &Mutex<ViewState>| view.lock().dirty = true;
        match key.code {
            KeyCode::Up => {
                self.focus = move_focus(self.focus, -1, 3);
                mark_dirty(&self.view);
                None
            }
            KeyCode::Down => {
                self.focus = move_focus(self.focus, 1, 3);
                mark_dirty(&self.view);
                None
            }
            KeyCode::Enter => self.focused_action(),
            _ => CounterAction::from_shortcut(key).filter(|action| self.action_enabled(*action)),
        }
    }

    fn perform(&mut self, action: CounterAction, service: &Arc<dyn FactService>) {
        perform_action(&self.model, action, service, &mut self.fetch);
    }

    fn dismiss(&mut self) -> bool {
        self.model.dismiss_fact()
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &RenderContext) {
        let mut view = self.view.lock();
        view.stack.settle(ctx.now);
        view.stack.render(frame, area, self.focus, ctx);
        if let Some(sheet) = view.sheet.presented() {
            sheet.render(frame, area, ctx.now);
        }
        view.dirty = false;
    }

    fn needs_display(&self, now: Instant) -> bool {
        let view = self.view.lock();
        view.dirty
            || !view.stack.indicator.hidden
            || view.stack.is_animating(now)
            || view.sheet.presented().is_some_and(|sheet| sheet.is_animating(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{Fact, FetchSettings};
    use crate::observation::QueueScheduler;
    use crossterm::event::KeyModifiers;

    fn loaded(presentation: FactPresentation) -> (CounterViewController, Arc<QueueScheduler>) {
        let model = Arc::new(CounterModel::new(FetchSettings::default()));
        let scheduler = Arc::new(QueueScheduler::new());
        let mut controller = CounterViewController::new(model, presentation);
        controller.view_did_load(scheduler.clone());
        (controller, scheduler)
    }

    #[test]
    fn load_copies_initial_state() {
        let (controller, _) = loaded(FactPresentation::Inline);
        assert_eq!(controller.update_count(), 1);
        assert_eq!(controller.count_text(), "0");
        assert_eq!(controller.fact_text(), None);
        assert!(!controller.is_indicator_visible());
        assert!(controller.buttons_enabled());
    }

    #[test]
    fn increment_updates_label_once() {
        let (controller, _) = loaded(FactPresentation::Inline);
        controller.model().increment();
        assert_eq!(controller.update_count(), 2);
        assert_eq!(controller.count_text(), "1");
    }

    #[test]
    fn loading_hides_buttons_and_shows_indicator() {
        let (controller, _) = loaded(FactPresentation::Inline);
        controller.model().set_fact_for_test(None, true);
        assert!(controller.is_indicator_visible());
        assert!(!controller.buttons_enabled());

        controller
            .model()
            .set_fact_for_test(Some(Fact::new("0 is zero")), false);
        assert!(!controller.is_indicator_visible());
        assert_eq!(controller.fact_text().as_deref(), Some("0 is zero"));
    }

    #[test]
    fn animated_dismiss_waits_for_scheduler() {
        let (controller, scheduler) = loaded(FactPresentation::Inline);
        controller
            .model()
            .set_fact_for_test(Some(Fact::new("5 is odd")), false);
        let runs = controller.update_count();

        assert!(controller.model().dismiss_fact());
        assert_eq!(controller.update_count(), runs);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(controller.update_count(), runs + 1);
        assert_eq!(controller.fact_text(), None);
    }

    #[test]
    fn fact_label_is_hidden_once_fade_out_ends() {
        let (controller, _) = loaded(FactPresentation::Inline);
        controller
            .model()
            .set_fact_for_test(Some(Fact::new("7 is lucky")), false);
        assert!(!controller.view.lock().stack.fact_label.hidden);

        controller.model().increment();
        let fading_from = Instant::now();
        assert!(!controller.view.lock().stack.fact_label.hidden);

        let mut view = controller.view.lock();
        view.stack
            .settle(fading_from + crate::observation::DEFAULT_ANIMATION * 2);
        assert!(view.stack.fact_label.hidden);
    }

    #[test]
    fn sheet_presents_and_dismisses_with_fact() {
        let (controller, _) = loaded(FactPresentation::Sheet);
        controller
            .model()
            .set_fact_for_test(Some(Fact::new("9 is square")), false);
        assert_eq!(controller.fact_text().as_deref(), Some("9 is square"));

        controller.model().increment();
        assert_eq!(controller.fact_text(), None);
    }

    #[test]
    fn disabled_buttons_swallow_keys() {
        let (mut controller, _) = loaded(FactPresentation::Inline);
        controller.model().set_fact_for_test(None, true);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(controller.handle_key(&enter), None);
        assert_eq!(controller.handle_key(&plus), None);
    }

    #[test]
    fn dropping_controller_stops_updates() {
        let (controller, _) = loaded(FactPresentation::Inline);
        let model = Arc::clone(controller.model());
        drop(controller);
        assert_eq!(model.registrar().observer_count(), 0);
        model.increment();
    }
}
