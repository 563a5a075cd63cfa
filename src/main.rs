mod app;
mod config;
mod data;
mod display;
mod feed;
mod model;
mod ui;

use std::{fs::File, io, sync::Arc, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, info};
use url::Url;

use app::{Action, App};
use config::Config;
use data::DataClient;
use feed::FetchOutcome;

fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn spawn_fetch(client: Arc<DataClient>, url: Url, tx: mpsc::Sender<FetchOutcome>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("fetching predictions from {}", url);
        let outcome = client.fetch_predictions(&url).await;
        let _ = tx.send(outcome).await;
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    init_logging(&config)?;

    let url = config.predictions_url()?;
    let client = Arc::new(DataClient::new(config.timeout())?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(4);

    // One fetch per launch; later ones only on request
    app.begin_fetch(spawn_fetch(client.clone(), url.clone(), tx.clone()));

    let res = run_app(&mut terminal, &mut app, &mut rx, || {
        spawn_fetch(client.clone(), url.clone(), tx.clone())
    })
    .await;

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("ui loop failed: {:?}", err);
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: Backend, F>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<FetchOutcome>,
    refetch: F,
) -> io::Result<()>
where
    F: Fn() -> JoinHandle<()>,
{
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let action = match key.code {
                    KeyCode::Char(c) => app.on_key(c),
                    KeyCode::Down => app.on_key('j'),
                    KeyCode::Up => app.on_key('k'),
                    _ => Action::None,
                };
                if action == Action::Refresh {
                    app.begin_fetch(refetch());
                }
            }
        }

        while let Ok(outcome) = rx.try_recv() {
            app.on_fetch_resolved(outcome);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
