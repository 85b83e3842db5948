//! Interactive browser (default command)

use crate::client::DebugClient;
use crate::config::Config;
use crate::tui::{self, TuiApp};
use crate::viewer::{Controller, Msg};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Run the terminal viewer until the user quits
pub async fn run(config: &Config) -> Result<()> {
    let client = DebugClient::from_config(config)?;
    let mut app = TuiApp::new(client.base_url());
    let mut controller = Controller::new(Arc::new(client));
    controller.dispatch(Msg::Startup);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
    controller: &mut Controller,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));

    loop {
        app.sync(controller.state());
        terminal.draw(|f| tui::draw(f, app, controller.state()))?;

        tokio::select! {
            // Handle keyboard events (non-blocking)
            _ = tick_interval.tick() => {
                while event::poll(Duration::from_millis(0))? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(msg) = app.handle_key(key, controller.state()) {
                        tracing::debug!("Dispatching {:?}", msg);
                        controller.dispatch(msg);
                    }
                    if app.should_quit {
                        return Ok(());
                    }
                }
            }

            // Apply fetch results as they land
            _ = controller.next(), if controller.in_flight() > 0 => {}
        }
    }
}
