mod app;
mod coach;
mod config;
mod engine;
mod error;
mod event;
mod games;
mod logging;
mod mood;
mod share;
mod sound;
mod store;
mod ui;

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use app::App;
use config::Config;
use event::{Event, EventHandler};
use games::GameId;
use store::SessionStore;

fn main() -> error::Result<()> {
    let config = Config::load()?;
    let data_dir = config.data_dir();
    let _log_guard = logging::init(&config, &data_dir);
    info!(data_dir = %data_dir.display(), "starting stresscade");

    let catalog: Vec<&str> = GameId::all().iter().map(|g| g.id()).collect();
    let store = SessionStore::open(&data_dir, &catalog)?;
    let mut app = App::new(&config, store)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.app.tick_rate_ms);
    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "main loop failed");
    }
    info!("bye");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> error::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
