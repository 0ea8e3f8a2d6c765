use ratatui::style::Color;

pub const TEXT: Color = Color::Rgb(0xe4, 0xe4, 0xe7);
pub const MUTED: Color = Color::Rgb(0x71, 0x71, 0x7a);
pub const BUTTON: Color = Color::Rgb(0x38, 0xbd, 0xf8);
pub const FOCUS_BG: Color = Color::Rgb(0x27, 0x27, 0x2a);
pub const SPINNER: Color = Color::Rgb(0x34, 0xd3, 0x99);
pub const FRAME_BORDER: Color = Color::Rgb(0x3f, 0x3f, 0x46);
pub const SHEET_BORDER: Color = Color::Rgb(0xe4, 0xe4, 0xe7);
pub const TAB_SEPARATOR: Color = Color::Rgb(0x52, 0x52, 0x5b);
