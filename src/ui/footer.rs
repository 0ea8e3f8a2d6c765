use crate::ui::theme::{FRAME_BORDER, MUTED, TEXT};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key, then what it does.
const KEY_HINTS: &[(&str, &str)] = &[
    ("Tab", "switch"),
    ("+/-", "count"),
    ("F", "get fact"),
    ("↑/↓ Enter", "buttons"),
    ("Esc", "dismiss"),
    ("Q", "quit"),
];

/// Bottom bar: key hints on the left, version on the right.
pub struct Footer;

impl Default for Footer {
    fn default() -> Self {
        Self::new()
    }
}

impl Footer {
    pub fn new() -> Self {
        Self
    }

    pub fn widget(&self, area: Rect) -> Paragraph<'static> {
        Paragraph::new(footer_line(area.width.saturating_sub(2))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FRAME_BORDER)),
        )
    }
}

fn footer_line(width: u16) -> Line<'static> {
    let key_style = Style::default().fg(TEXT).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(MUTED);

    let mut spans = vec![Span::raw(" ")];
    for (index, (key, action)) in KEY_HINTS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", text_style));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(" {action}"), text_style));
    }

    let version = format!("v{VERSION} ");
    let used: usize = spans.iter().map(Span::width).sum();
    let padding = usize::from(width)
        .saturating_sub(used)
        .saturating_sub(version.chars().count());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(version, text_style));
    Line::from(spans)
}
