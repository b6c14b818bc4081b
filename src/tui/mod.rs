// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::AppContext;
use crate::controller::{ListManager, ManagerSettings};
use crate::gateway::PersistenceGateway;
use crate::store::FileStore;
use crate::timer::SystemClock;
use crate::tui::action::Action;
use crate::tui::state::TuiView;
use crate::tui::view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration, time::Instant};

const MAX_POLL: Duration = Duration::from_millis(250);

pub fn run(ctx: &dyn AppContext, cfg: &Config) -> Result<()> {
    // Panic Hook
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        log::error!("PANIC: {}", info);
        default_hook(info);
    }));

    // --- 1. STATE INIT ---
    let store = FileStore::new(ctx.get_store_path()?).with_quota(cfg.storage_quota_bytes);
    let gateway = PersistenceGateway::new(Box::new(store));
    let mut manager = ListManager::initialize(
        gateway,
        TuiView::new(),
        Box::new(SystemClock),
        ManagerSettings::from(cfg),
    );

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if cfg.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. UI LOOP ---
    let result = event_loop(&mut terminal, &mut manager);

    // --- 4. CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    manager: &mut ListManager<TuiView>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, manager.view_mut()))?;

        let timeout = manager
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(MAX_POLL, |d| d.min(MAX_POLL));

        if event::poll(timeout)? {
            let action = match event::read()? {
                Event::Key(key) => {
                    // Filter out KeyRelease events to prevent double input on Windows
                    if key.kind == event::KeyEventKind::Release {
                        None
                    } else {
                        handlers::handle_key_event(key, manager.view_mut())
                    }
                }
                Event::Mouse(mouse) => handlers::handle_mouse_event(mouse, manager.view_mut()),
                _ => None,
            };

            match action {
                Some(Action::Quit) => break,
                Some(Action::Dispatch(intent)) => manager.dispatch(intent),
                None => {}
            }
        }

        manager.tick();
    }
    Ok(())
}
