//! Child sheet showing a fact over the counter.

use std::time::Instant;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::counter::Fact;
use crate::observation::Animation;
use crate::ui::animation::{faded, Fade};
use crate::ui::layout::{centered_rect_by_size, wrapped_height};
use crate::ui::theme::{MUTED, SHEET_BORDER, TEXT};

const SHEET_WIDTH: u16 = 48;

/// A presented fact. Fades in over the animation it was presented with.
#[derive(Debug, Clone)]
pub struct FactSheet {
    fact: Fact,
    appear: Fade,
}

impl FactSheet {
    pub fn new(fact: Fact, animation: Option<Animation>, now: Instant) -> Self {
        let mut appear = Fade::new(0.0, now);
        appear.animate_to(1.0, animation, now);
        Self { fact, appear }
    }

    pub fn fact(&self) -> &Fact {
        &self.fact
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.appear.is_animating(now)
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, now: Instant) {
        let Some(style) = faded(Style::default().fg(TEXT), self.appear.value(now)) else {
            return;
        };

        let text_height = wrapped_height(self.fact.text(), SHEET_WIDTH.saturating_sub(4));
        // text, blank, hint, borders
        let height = text_height.saturating_add(4);
        let rect = centered_rect_by_size(area, SHEET_WIDTH, height);

        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(" Fact ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SHEET_BORDER));

        let mut lines: Vec<Line<'_>> = self
            .fact
            .text()
            .lines()
            .map(|part| Line::from(Span::styled(part, style)))
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Esc to dismiss",
            Style::default().fg(MUTED),
        )));

        let widget = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(widget, rect);
    }
}
