//! jack - call the operations of an OpenAPI document from the command line
//!
//! Operations are addressed by their camelCased `operationId`, exactly as a
//! bound client exposes them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use jack_cli::{load_document, operation_lines, parse_arguments};
use jack_client::{ArgumentPlacement, Client, ClientSettings, HttpTransport};

/// jack - runtime OpenAPI client
#[derive(Parser, Debug)]
#[command(name = "jack")]
#[command(version)]
#[command(about = "Bind an OpenAPI document and call its operations")]
struct Args {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bound operations of a document
    List {
        /// OpenAPI document (JSON or YAML)
        #[arg(long)]
        spec: PathBuf,
    },
    /// Call one operation and print the response
    Call {
        /// OpenAPI document (JSON or YAML)
        #[arg(long)]
        spec: PathBuf,

        /// Operation key (camelCased operationId)
        operation: String,

        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,

        /// Base URL; defaults to the settings file, then the document's first server
        #[arg(long, env = "JACK_BASE_URL")]
        base_url: Option<String>,

        /// Settings file (JSON)
        #[arg(long, env = "JACK_CONFIG")]
        config: Option<PathBuf>,

        /// Split arguments by declared location instead of sending them all as query/body
        #[arg(long)]
        by_location: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match args.command {
        Command::List { spec } => {
            let document = load_document(&spec)?;
            let client = Client::bind(&document, ());

            println!(
                "{} {}",
                document.title().unwrap_or("untitled"),
                document.version().unwrap_or("")
            );
            for line in operation_lines(&client) {
                println!("{}", line);
            }
        }
        Command::Call {
            spec,
            operation,
            args,
            base_url,
            config,
            by_location,
        } => {
            let document = load_document(&spec)?;

            let mut settings = match config {
                Some(path) => ClientSettings::load(&path)
                    .with_context(|| format!("Failed to load settings from {}", path.display()))?,
                None => ClientSettings::new(),
            };
            if let Some(base_url) = base_url {
                settings.base_url = Some(base_url);
            }
            if by_location {
                settings.placement = ArgumentPlacement::ByLocation;
            }
            debug!("Settings: {:?}", settings);

            let placement = settings.placement;
            let transport = HttpTransport::for_document(&document, settings)?;
            info!("Calling {} on {}", operation, transport.base_url());

            let client = Client::bind_with(&document, transport.into(), placement);
            let arguments = parse_arguments(args.as_deref())?;
            let response = client.call(&operation, arguments).await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
