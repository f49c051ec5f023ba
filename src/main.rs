use anyhow::{bail, Result};
use scrape_dash::app::App;
use scrape_dash::backend;
use scrape_dash::config::{BackendMode, Config, DEFAULT_CONFIG_FILE};
use scrape_dash::tui::{self, state::AppState};
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};

struct Args {
    config: PathBuf,
    mode: Option<BackendMode>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from(DEFAULT_CONFIG_FILE),
        mode: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mock" => args.mode = Some(BackendMode::Mock),
            "--rest" => args.mode = Some(BackendMode::Rest),
            "--config" => match iter.next() {
                Some(path) => args.config = PathBuf::from(path),
                None => bail!("--config requires a path"),
            },
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("scrape-dash.log")?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scrape_dash=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let args = parse_args()?;

    // .env values fill in anything not already set in the environment
    Config::load_env_file();
    let mut config = Config::load_or_default(&args.config)?;
    config.apply_env();
    if let Some(mode) = args.mode {
        config.api.mode = mode;
    }

    let backend = backend::from_config(&config.api)?;
    tracing::info!(
        backend = backend.name(),
        config = %args.config.display(),
        "starting scrape-dash"
    );

    let (state_tx, state_rx) = watch::channel(AppState::new(backend.name(), config.ui.page_size));
    let (cmd_tx, cmd_rx) = mpsc::channel::<tui::TuiCommand>(16);

    let app = App::new(&config, backend, state_tx);
    let engine = tokio::spawn(app.run(cmd_rx));

    tui::run_tui(state_rx, cmd_tx).await?;

    // run_tui dropped cmd_tx, so the engine loop sees a closed channel
    if let Err(e) = engine.await {
        tracing::error!("engine task failed: {}", e);
    }
    tracing::debug!("shutting down");
    Ok(())
}
