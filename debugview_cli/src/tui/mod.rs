//! Terminal user interface for browsing a debug server

mod app;
mod ui;

pub use app::TuiApp;
pub use ui::draw;
