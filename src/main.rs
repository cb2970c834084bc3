//! acumen-tui - A terminal browser for hierarchical business data
//!
//! Loads customer, product, promotion, budget and analytics datasets into
//! drill-through tables with search, sorting, pagination and expandable rows.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use log::{error, info};
use std::time::Duration;

fn main() -> Result<()> {
    let config = Config::load_or_init();
    logging::init(&config);
    info!("starting acumen-tui {}", env!("CARGO_PKG_VERSION"));

    // Load data before touching the terminal so failures print normally
    let mut app = App::new(config)?;
    app.init()?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        error!("fatal: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!("draw error: {}", e);
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
