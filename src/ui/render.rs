use std::time::Instant;

use ratatui::widgets::Clear;
use ratatui::Frame;

use crate::ui::app::App;
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::layout_regions;

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let (header, body, footer) = layout_regions(area);

    frame.render_widget(Header::new().widget(app.active()), header);
    frame.render_widget(Clear, body);
    let ctx = app.render_context(Instant::now());
    app.render_screen(frame, body, &ctx);
    frame.render_widget(Footer::new().widget(footer), footer);
}
