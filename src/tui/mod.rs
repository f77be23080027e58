mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

// The main function to run the TUI
pub use self::run_tui::run_department_tui;

// Terminal setup/teardown and the main loop
mod run_tui {
    use super::app_logic::TuiApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::api::ResourceClient;
    use crate::view::DepartmentView;
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Must be called from within a tokio runtime; background work is spawned on it.
    pub fn run_department_tui(
        view: DepartmentView,
        client: Arc<dyn ResourceClient>,
        page_delay: Duration,
    ) -> Result<()> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut app = TuiApp::new(view, client, events_tx, page_delay);
        app.start_load();

        let mut terminal = init_terminal()?;
        let outcome = run_loop(&mut terminal, &mut app, &mut events_rx);
        restore_terminal(terminal)?;
        outcome
    }

    fn run_loop(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut TuiApp,
        events_rx: &mut mpsc::UnboundedReceiver<super::app_state::AppEvent>,
    ) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app, events_rx)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
