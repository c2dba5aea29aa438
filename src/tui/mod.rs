//! TUI module for the interactive asset dashboard
//!
//! Full-screen terminal UI built on Ratatui. Every read and write goes through
//! the [`Session`](crate::session::Session) held by [`AppState`]; the loop only
//! draws, polls input and runs the deferred reload.

pub mod events;
pub mod screens;
pub mod state;
pub mod theme;
pub mod widgets;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};

use self::events::{handle_event, handle_mouse_event, EventResult};
use self::screens::render;
use self::state::AppState;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI application
pub fn run(mut app_state: AppState) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app_state);

    // Restore terminal, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Term, app_state: &mut AppState) -> Result<()> {
    loop {
        // Increment tick for animations
        app_state.tick = app_state.tick.wrapping_add(1);
        terminal.draw(|f| render(f, app_state))?;

        // Reload after the loading state has been drawn
        if app_state.refresh_pending {
            app_state.perform_refresh();
            continue;
        }

        if !event::poll(app_state.tick_rate)? {
            continue;
        }
        if dispatch(app_state, event::read()?) == EventResult::Quit {
            return Ok(());
        }

        // Drain any other pending events to prevent lag
        while event::poll(std::time::Duration::from_millis(0))? {
            if dispatch(app_state, event::read()?) == EventResult::Quit {
                return Ok(());
            }
        }
    }
}

fn dispatch(app_state: &mut AppState, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_event(app_state, key.code, key.modifiers)
        }
        Event::Mouse(mouse) => handle_mouse_event(app_state, mouse),
        _ => EventResult::Continue,
    }
}
