use crate::config::ScreenKind;
use crate::ui::theme::{BUTTON, FRAME_BORDER, TAB_SEPARATOR, TEXT};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Tab strip naming the two renditions of the counter.
pub struct Header;

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn widget(&self, active: ScreenKind) -> Paragraph<'static> {
        let text_style = Style::default().fg(TEXT);
        let separator_style = Style::default().fg(TAB_SEPARATOR);
        let active_style = Style::default().fg(BUTTON).add_modifier(Modifier::BOLD);
        let tab = |kind: ScreenKind, label: &'static str| {
            if kind == active {
                Span::styled(label, active_style)
            } else {
                Span::styled(label, text_style)
            }
        };
        let line = Line::from(vec![
            Span::styled("  ", text_style),
            tab(ScreenKind::Declarative, "Declarative"),
            Span::styled("  │  ", separator_style),
            tab(ScreenKind::Imperative, "Imperative"),
        ]);

        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(FRAME_BORDER)),
        )
    }
}
