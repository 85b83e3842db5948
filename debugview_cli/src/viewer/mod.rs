//! Viewer core shared by the terminal UI and the one-shot commands

mod controller;
mod state;

pub use controller::{perform, Controller, DataSource};
pub use state::{DatabaseList, Effect, Msg, RequestToken, ViewerState};
