//! Terminal UI: two renditions of the same counter behind one app shell.

pub mod animation;
pub mod app;
pub mod declarative;
pub mod events;
pub mod footer;
pub mod header;
pub mod imperative;
pub mod input;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod screen;
pub mod terminal_guard;
pub mod theme;

pub use runtime::run;
