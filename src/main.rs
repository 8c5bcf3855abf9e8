mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod modal;
mod navigation;
mod panel;
mod preview;
mod shell;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use crate::app::App;
use crate::config::{AppConfig, ExitDirTarget};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// A keyboard-driven single/dual-panel terminal file browser.
#[derive(Parser, Debug)]
#[command(name = "fm", version, about)]
struct Cli {
    /// Write the final directory to FILE on quit; without FILE, create a
    /// temp file and print its path first (for a shell `cd` wrapper)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    cd: Option<Option<PathBuf>>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.cd)?;
    logging::init(&config);

    let exit_file = match &config.exit_dir {
        Some(target) => {
            let file = shell::prepare_exit_file(target)?;
            if *target == ExitDirTarget::TempFile {
                println!("{}", file.display());
            }
            Some(file)
        }
        None => None,
    };

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(config);
    info!(dir = %app.exit_directory().display(), "started");

    let result = run(&mut tui, &mut app).await;
    tui.restore()?;

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    if let Some(file) = exit_file {
        shell::write_exit_dir(&file, app.exit_directory());
    }
    result
}

async fn run(tui: &mut Tui, app: &mut App) -> error::Result<()> {
    app.set_viewport(ui::list_rows(tui.height()?));
    let mut events = EventHandler::new(app.config.tick_rate);

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, height) => app.set_viewport(ui::list_rows(height)),
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
