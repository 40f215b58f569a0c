//! Command-line chat log viewer.
//!
//! Each load resolves the channel, pulls its logs together with the
//! 7TV / BTTV / FFZ catalogs, and writes the rendered page to disk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use chatlog_client::{HttpSource, JsonSource};
use chatlog_viewer_lib::controller::{ViewController, ViewState};
use chatlog_viewer_lib::view::{ChatView, HtmlFileView};

#[derive(Debug, Parser)]
#[command(name = "chatlog-viewer")]
#[command(about = "Render historical chat logs with 7TV, BTTV and FFZ emotes")]
struct Cli {
    /// Channel to load
    #[arg(env = "DEFAULT_CHANNEL")]
    channel: Option<String>,

    /// Only show messages from this user
    #[arg(long, short)]
    user: Option<String>,

    /// HTML file to write (overrides OUTPUT_PATH)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Number of messages to request (overrides LOG_LIMIT)
    #[arg(long)]
    limit: Option<usize>,

    /// Also load global emote catalogs (overrides INCLUDE_GLOBAL_EMOTES)
    #[arg(long)]
    global_emotes: bool,

    /// Read `channel [user]` lines from stdin, one load per line
    #[arg(long, short)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = chatlog_viewer_lib::init_config()?;
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(limit) = cli.limit {
        config.set_log_limit(limit)?;
    }
    if cli.global_emotes {
        config.include_global_emotes = true;
    }

    let source = HttpSource::new(config.http_timeout)?;
    let controller = ViewController::new(
        source,
        config.endpoints()?,
        config.load_options(),
        HtmlFileView::new(&config.output_path),
    );

    if cli.interactive {
        run_interactive(&controller).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let channel = cli.channel.unwrap_or_default();
    let user = cli.user.unwrap_or_default();
    match controller.load(&channel, &user).await? {
        ViewState::Rendered { .. } => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn run_interactive<S: JsonSource + Sync, V: ChatView>(
    controller: &ViewController<S, V>,
) -> anyhow::Result<()> {
    eprintln!("Enter `channel [user]` per line, Ctrl+D to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let channel = parts.next().unwrap_or_default();
        let user = parts.next().unwrap_or_default();
        controller.load(channel, user).await?;
    }

    tracing::info!("Input closed, exiting");
    Ok(())
}
