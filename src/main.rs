use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod channel;
mod controller;
mod dataset;
mod domain;
mod fetch;
mod inputter;
mod model;
mod provision;
mod search;
mod table;
mod ui;

use controller::Controller;
use domain::{FltConfig, FltError};
use fetch::HttpFetcher;
use model::{Model, Status};

#[derive(Parser, Debug)]
#[command(name = "flt", about = "Live-filter a JSON dataset as a table.")]
struct Cli {
    /// Dataset endpoint returning a JSON array of flat objects
    #[arg(long, default_value = "http://localhost:1337/beers")]
    url: String,

    /// Channel name shared by the search box and the table
    #[arg(long, default_value = "beers")]
    channel: String,

    /// Detach both components from the channel (solo mode)
    #[arg(long)]
    solo: bool,

    /// Terminal event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Append logs here; the terminal itself belongs to the UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: Cli) -> Result<(), FltError> {
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }

    let cfg = FltConfig {
        url: cli.url,
        channel: (!cli.solo).then_some(cli.channel),
        event_poll_time: cli.poll_ms,
    };

    // Both suspension points (provisioning, dataset fetch) happen here,
    // before the terminal is taken over.
    let fetcher = HttpFetcher::new();
    let mut model = Model::attach(&cfg, &fetcher)?;

    let controller = Controller::new(&cfg);
    let mut terminal = ratatui::init();

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui::draw(&model, f))?;

        if let Some(message) = controller.handle_event()? {
            model.update(message)?;
        }
    }

    Ok(())
}
