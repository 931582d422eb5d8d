use clap::Parser;
use color_eyre::Result;
use flixdash::{
    logging, App, AppConfig, AppEvent, Args, CacheManager, ConfigManager, DashboardOptions, Theme,
    APP_NAME,
};
use ratatui::DefaultTerminal;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    mut app: App,
    (tx, rx): (Sender<AppEvent>, Receiver<AppEvent>),
    poll_interval: Duration,
) -> Result<()> {
    render(&mut terminal, &mut app)?;
    tx.send(app.open_event())?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME) {
            Ok(config) => match config.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let config = AppConfig::load(APP_NAME)?;
    let options = DashboardOptions::from_args_and_config(&args, &config)?;
    let theme = Theme::from_config(&config.theme)?;

    let cache = CacheManager::new(APP_NAME)?;
    let level = logging::resolve_level(
        args.log_level,
        std::env::var(logging::LOG_ENV).ok(),
        &config.logging.level,
    );
    // flushes the log file when dropped
    let _log_guard = logging::init(&cache, &level, &config.logging.file_name)?;

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_theme(options, theme);
    if args.debug || config.debug.enabled {
        app.enable_debug();
    }
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);

    let terminal = ratatui::init();
    let result = run(terminal, app, (tx, rx), poll_interval);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
