pub mod cli;
pub mod config;
pub mod counter;
pub mod logging;
pub mod navigation;
pub mod observation;
pub mod shutdown;
pub mod ui;
