use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use banter::core::config::{self, CliOverrides};
use banter::tui;

#[derive(Parser)]
#[command(name = "banter", about = "Terminal chat UI with a canned assistant")]
struct Args {
    /// Simulated reply delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Start with the conversation sidebar hidden
    #[arg(long)]
    hide_sidebar: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to banter.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("banter.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("banter starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e}");
        Default::default()
    });
    let config = config::resolve(
        file_config,
        &CliOverrides {
            reply_delay_ms: args.delay_ms,
            hide_sidebar: args.hide_sidebar,
        },
    );

    tui::run(config)
}
