use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ghseek::action::Action;
use ghseek::app::App;
use ghseek::config::Config;
use ghseek::event::Event;
use ghseek::github::GitHub;
use ghseek::tui::{self, EventHandler};
use ghseek::{auth, ui};

/// Search GitHub users and browse their repositories
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run this search on startup
    #[arg(short, long)]
    query: Option<String>,

    /// REST API base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Send requests without a token even if one is configured
    #[arg(long)]
    no_auth: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = Config::load()?;
    let api_url = cli.api_url.clone().unwrap_or_else(|| config.api_url.clone());
    let token = if cli.no_auth {
        None
    } else {
        auth::load_token(&config)
    };

    let github = GitHub::new(api_url, token)?;
    if !github.is_authenticated() {
        tracing::info!("no token configured, using unauthenticated rate limits");
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(github, &config, cli.query).await;

    tui::restore()?;

    result
}

async fn run(
    github: GitHub,
    config: &Config,
    initial_query: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(Arc::new(github), config.scroll_threshold, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16);
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    Event::Init => {
                        if let Some(query) = &initial_query {
                            for c in query.chars() {
                                app.update(Action::InputChar(c));
                            }
                            action_tx.send(Action::Submit)?;
                        }
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
