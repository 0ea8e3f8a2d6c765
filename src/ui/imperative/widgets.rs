//! Retained widgets for the imperative screen.
//!
//! Widgets are built once and mutated in place by the observation loop.
//! Drawing reads their current properties and nothing else.

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::animation::{faded, Fade};
use crate::ui::layout::{centered_rect_by_size, wrapped_height};
use crate::ui::screen::{CounterAction, RenderContext};
use crate::ui::theme::{BUTTON, FOCUS_BG, FRAME_BORDER, MUTED, SPINNER, TEXT};

/// Blank lines between arranged rows.
pub const STACK_SPACING: u16 = 1;
const STACK_WIDTH: u16 = 44;

#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub hidden: bool,
    pub alpha: Fade,
}

impl Label {
    pub fn new(now: Instant) -> Self {
        Self {
            text: String::new(),
            hidden: false,
            alpha: Fade::new(1.0, now),
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        !self.hidden && faded(Style::default(), self.alpha.value(now)).is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub action: CounterAction,
    pub enabled: bool,
}

impl Button {
    pub fn new(action: CounterAction) -> Self {
        Self {
            action,
            enabled: true,
        }
    }

    pub fn title(&self) -> &'static str {
        self.action.title()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityIndicator {
    pub hidden: bool,
}

/// Centered vertical stack: count label, decrement and increment buttons,
/// fact label, activity indicator and the fetch button.
#[derive(Debug, Clone)]
pub struct CounterStack {
    pub count_label: Label,
    pub decrement: Button,
    pub increment: Button,
    pub fact_label: Label,
    pub indicator: ActivityIndicator,
    pub fetch: Button,
}

impl CounterStack {
    pub fn new(now: Instant) -> Self {
        let mut fact_label = Label::new(now);
        fact_label.hidden = true;
        fact_label.alpha = Fade::new(0.0, now);
        Self {
            count_label: Label::new(now),
            decrement: Button::new(CounterAction::Decrement),
            increment: Button::new(CounterAction::Increment),
            fact_label,
            indicator: ActivityIndicator { hidden: true },
            fetch: Button::new(CounterAction::FetchFact),
        }
    }

    /// Buttons in focus order.
    pub fn buttons(&self) -> [&Button; 3] {
        [&self.decrement, &self.increment, &self.fetch]
    }

    pub fn set_buttons_enabled(&mut self, enabled: bool) {
        self.decrement.enabled = enabled;
        self.increment.enabled = enabled;
        self.fetch.enabled = enabled;
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.count_label.alpha.is_animating(now) || self.fact_label.alpha.is_animating(now)
    }

    /// Hide the fact label once it has faded out completely.
    pub fn settle(&mut self, now: Instant) {
        let label = &mut self.fact_label;
        if label.alpha.target() == 0.0 && !label.alpha.is_animating(now) {
            label.hidden = true;
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, focus: usize, ctx: &RenderContext) {
        let inner_width = STACK_WIDTH.saturating_sub(4);
        let mut rows: Vec<Vec<Line<'static>>> = Vec::new();

        if let Some(lines) = label_lines(&self.count_label, ctx.now) {
            rows.push(lines);
        }
        for (index, button) in self.buttons().into_iter().take(2).enumerate() {
            rows.push(vec![button_line(button, index == focus)]);
        }
        if let Some(lines) = label_lines(&self.fact_label, ctx.now) {
            rows.push(lines);
        }
        if !self.indicator.hidden {
            rows.push(vec![Line::from(Span::styled(
                ctx.spinner(),
                Style::default().fg(SPINNER),
            ))]);
        }
        rows.push(vec![button_line(&self.fetch, focus == 2)]);

        let mut lines = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            if index > 0 {
                lines.extend((0..STACK_SPACING).map(|_| Line::default()));
            }
            lines.extend(row);
        }

        let content_height: u16 = lines
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                wrapped_height(&text, inner_width).max(1)
            })
            .sum();
        let rect = centered_rect_by_size(area, STACK_WIDTH, content_height.saturating_add(2));
        let block = Block::default()
            .title(" Counter ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FRAME_BORDER));
        let widget = Paragraph::new(lines)
            .block(block)
            .centered()
            .wrap(Wrap { trim: true });
        frame.render_widget(widget, rect);
    }
}

fn label_lines(label: &Label, now: Instant) -> Option<Vec<Line<'static>>> {
    if label.hidden {
        return None;
    }
    let style = faded(Style::default().fg(TEXT), label.alpha.value(now))?;
    Some(
        label
            .text
            .lines()
            .map(|part| Line::from(Span::styled(part.to_string(), style)))
            .collect(),
    )
}

fn button_line(button: &Button, focused: bool) -> Line<'static> {
    let mut style = if button.enabled {
        Style::default().fg(BUTTON)
    } else {
        Style::default().fg(MUTED)
    };
    if focused {
        style = style.bg(FOCUS_BG).add_modifier(Modifier::BOLD);
    }
    Line::from(Span::styled(button.title(), style))
}
