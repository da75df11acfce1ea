use std::{process::ExitCode, rc::Rc};

use clap::{Parser, Subcommand};
use quickurl_web::{
    client::shortener_api_capsule,
    config,
    controller::{ResolveFlow, ShortenFlow},
    page::{Navigator, ResultSlot},
    terminal::{TerminalNavigator, TerminalSlot},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Shorten and resolve links against a quickurl service
#[derive(Parser)]
#[command(name = "quickurl", version, about, long_about = None)]
struct Cli {
    /// Service origin; falls back to $QUICKURL_BASE_URL, then http://127.0.0.1:5000
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a short link for an https URL
    Shorten {
        url: String,

        /// Custom short code (2-64 letters and digits)
        #[arg(long)]
        code: Option<String>,
    },
    /// Look up where a short code points
    Resolve { code: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = config::base_url_from_env(cli.base_url.as_deref())?;
    let container = config::init_container(base_url.clone());
    let api = container.read(shortener_api_capsule);
    let slot = Rc::new(TerminalSlot::default());

    let succeeded = match cli.command {
        Command::Shorten { url, code } => {
            let flow = ShortenFlow::new(api, Rc::clone(&slot) as Rc<dyn ResultSlot>);
            let succeeded = flow.submit(&url, code.as_deref()).await.is_ok();
            slot.print();
            succeeded
        }
        Command::Resolve { code } => {
            let navigator = Rc::new(TerminalNavigator::new(base_url));
            let flow = ResolveFlow::new(
                api,
                Rc::clone(&slot) as Rc<dyn ResultSlot>,
                Rc::clone(&navigator) as Rc<dyn Navigator>,
            );
            let succeeded = flow.submit(&code).await.is_ok();
            slot.print();
            if let Some(target) = navigator.target() {
                info!(%target, "Resolved short link");
                println!("{target}");
            }
            succeeded
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
