use super::app_logic::TuiApp;
use super::app_state::{AppEvent, AppMode};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// One turn of the UI loop: apply finished background work, then at most one key.
pub(super) fn handle_events(
    app: &mut TuiApp,
    completions: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    while let Ok(completion) = completions.try_recv() {
        app.handle_app_event(completion);
    }

    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind == KeyEventKind::Press {
                if app.view.prompt().is_some() {
                    app.handle_confirm_input(key_event);
                } else {
                    match app.mode {
                        AppMode::Normal => app.handle_normal_mode_input(key_event),
                        AppMode::Filtering => app.handle_filtering_mode_input(key_event),
                    }
                }
            }
        }
    }
    app.tick = app.tick.wrapping_add(1);
    Ok(())
}
