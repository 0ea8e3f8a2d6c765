//! Declarative rendition: the view is a function of model state.
//!
//! [`body`] builds a [`Form`] from whatever it reads off the model. The
//! screen rebuilds it inside [`WithTracking`] on every draw, so a change
//! to anything the last body read marks the screen for display. No
//! re-subscription code lives here.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::counter::{CounterModel, FactService};
use crate::observation::WithTracking;
use crate::ui::layout::{centered_rect_by_size, wrapped_height};
use crate::ui::screen::{
    move_focus, perform_action, CounterAction, FetchTask, RenderContext, Screen,
};
use crate::ui::theme::{BUTTON, FOCUS_BG, FRAME_BORDER, MUTED, SPINNER, TEXT};

const FORM_WIDTH: u16 = 44;

/// One row of the counter form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRow {
    Text(String),
    Button(CounterAction),
    Progress,
}

/// The declarative view tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub rows: Vec<FormRow>,
    /// Every control is disabled while a fact loads.
    pub disabled: bool,
}

impl Form {
    pub fn buttons(&self) -> impl Iterator<Item = CounterAction> + '_ {
        self.rows.iter().filter_map(|row| match row {
            FormRow::Button(action) => Some(*action),
            _ => None,
        })
    }
}

/// Build the form from current model state.
pub fn body(model: &CounterModel) -> Form {
    let mut rows = vec![
        FormRow::Text(model.count().to_string()),
        FormRow::Button(CounterAction::Decrement),
        FormRow::Button(CounterAction::Increment),
    ];

    if let Some(fact) = model.fact() {
        rows.push(FormRow::Text(fact.text().to_string()));
    } else if model.fact_is_loading() {
        rows.push(FormRow::Progress);
    }

    rows.push(FormRow::Button(CounterAction::FetchFact));

    Form {
        rows,
        disabled: model.fact_is_loading(),
    }
}

/// The declarative counter screen.
pub struct CounterView {
    model: Arc<CounterModel>,
    tracking: WithTracking,
    fetch: FetchTask,
    focus: usize,
    last_form: Option<Form>,
}

impl CounterView {
    pub fn new(model: Arc<CounterModel>) -> Self {
        Self {
            model,
            tracking: WithTracking::new(),
            fetch: FetchTask::new(),
            focus: 0,
            last_form: None,
        }
    }

    pub fn model(&self) -> &Arc<CounterModel> {
        &self.model
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Rebuild the form under tracking.
    pub fn build(&mut self) -> Form {
        let model = &self.model;
        let form = self.tracking.render(|| body(model));
        self.last_form = Some(form.clone());
        form
    }

    fn is_disabled(&self) -> bool {
        self.last_form.as_ref().is_some_and(|form| form.disabled)
    }
}

impl Screen for CounterView {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<CounterAction> {
        let buttons: Vec<CounterAction> = match &self.last_form {
            Some(form) => form.buttons().collect(),
            None => body(&self.model).buttons().collect(),
        };
        match key.code {
            KeyCode::Up => {
                self.focus = move_focus(self.focus, -1, buttons.len());
                self.tracking.set_needs_display();
                None
            }
            KeyCode::Down => {
                self.focus = move_focus(self.focus, 1, buttons.len());
                self.tracking.set_needs_display();
                None
            }
            _ if self.is_disabled() => None,
            KeyCode::Enter => buttons.get(self.focus).copied(),
            _ => CounterAction::from_shortcut(key),
        }
    }

    fn perform(&mut self, action: CounterAction, service: &Arc<dyn FactService>) {
        perform_action(&self.model, action, service, &mut self.fetch);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &RenderContext) {
        let form = self.build();
        let inner_width = FORM_WIDTH.saturating_sub(4);

        let mut lines = Vec::new();
        let mut button_index = 0;
        for row in &form.rows {
            match row {
                FormRow::Text(text) => {
                    for part in text.lines() {
                        lines.push(Line::from(Span::styled(
                            part.to_string(),
                            Style::default().fg(TEXT),
                        )));
                    }
                }
                FormRow::Button(action) => {
                    let focused = button_index == self.focus;
                    button_index += 1;
                    let mut style = if form.disabled {
                        Style::default().fg(MUTED)
                    } else {
                        Style::default().fg(BUTTON)
                    };
                    if focused {
                        style = style.bg(FOCUS_BG).add_modifier(Modifier::BOLD);
                    }
                    lines.push(Line::from(Span::styled(action.title(), style)));
                }
                FormRow::Progress => {
                    lines.push(Line::from(Span::styled(
                        ctx.spinner(),
                        Style::default().fg(SPINNER),
                    )));
                }
            }
        }

        let height: u16 = form
            .rows
            .iter()
            .map(|row| match row {
                FormRow::Text(text) => wrapped_height(text, inner_width),
                _ => 1,
            })
            .sum::<u16>()
            .saturating_add(2);
        let rect = centered_rect_by_size(area, FORM_WIDTH, height);
        let block = Block::default()
            .title(" Counter ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FRAME_BORDER));
        let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(widget, rect);
    }

    fn needs_display(&self, _now: Instant) -> bool {
        self.tracking.needs_display() || self.model.fact_is_loading_untracked()
    }
}
