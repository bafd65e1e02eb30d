//! Choose-your-own-adventure reader.
//!
//! A terminal interface for browsing a library of branching stories, viewing
//! each story as a tree of fragments, and reading through it.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! cargo run -p adventure -- --headless
//! ```

mod app;
mod demo;
mod events;
mod headless;
mod ui;

use adventure_core::persist;
use adventure_core::{AdventureConfig, EnvProfile, ReadingSession, UserProfileLookup};
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let headless = args.iter().any(|a| a == "--headless");

    // Log lines would tear the alternate screen, so the TUI only reports
    // errors unless RUST_LOG asks for more.
    let mut filter = EnvFilter::from_default_env();
    if headless {
        filter = filter
            .add_directive("adventure=info".parse()?)
            .add_directive("adventure_core=info".parse()?);
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match AdventureConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if args.iter().any(|a| a == "--demo") {
        let mut profile =
            UserProfileLookup::new(EnvProfile::new(config.profile_env_vars.iter().cloned()));
        let author = profile.user_name().unwrap_or("Anonymous").to_string();
        let path = demo::install_demo(&config.library_dir, &author).await?;
        println!("Demo story written to {}", path.display());
    }

    if headless {
        return headless::run_headless(config).await.map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(config)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Process any pending library reload
        if app.pending_reload {
            app.pending_reload = false;
            match persist::list_stories(&app.config.library_dir).await {
                Ok(stories) => {
                    let count = stories.len();
                    app.set_stories(stories);
                    app.set_status(format!(
                        "{count} stories in {}",
                        app.config.library_dir.display()
                    ));
                }
                Err(e) => app.set_status(format!("Could not read library: {e}")),
            }
            continue;
        }

        // Process any pending open operation
        if let Some(path) = app.pending_open.take() {
            match ReadingSession::load(&path).await {
                Ok(session) => app.open_session(session),
                Err(e) => app.set_status(format!("Open failed: {e}")),
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Adventure - read and explore choose-your-own-adventure stories");
    println!();
    println!("USAGE:");
    println!("  adventure [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Run in headless mode (text-only, no TUI)");
    println!("  --demo           Write a demo story into the library first");
    println!();
    println!("ENVIRONMENT:");
    println!("  ADVENTURE_LIBRARY_DIR     Story library directory (default: stories)");
    println!("  ADVENTURE_FIRST_LINE      Node preview first line length (default: 18)");
    println!("  ADVENTURE_SECOND_LINE     Node preview second line length (default: 14)");
    println!("  ADVENTURE_USER_NAME       Display name, falling back to USER/USERNAME");
    println!("  RUST_LOG                  Log filter, e.g. adventure_core=debug");
}
