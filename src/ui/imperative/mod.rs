//! Imperative rendition: retained widgets updated by an observation loop.

mod controller;
mod fact_sheet;
mod widgets;

pub use controller::CounterViewController;
pub use fact_sheet::FactSheet;
pub use widgets::{ActivityIndicator, Button, CounterStack, Label, STACK_SPACING};
