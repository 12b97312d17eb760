//! nodeadm-userdata - render user data for nodeadm worker nodes
//!
//! Reads a node config (YAML or JSON), validates it and writes the
//! multipart MIME user data consumed on first boot.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nodeadm_userdata::config::load_node_config;
use nodeadm_userdata::userdata::{self, Encoding};

#[derive(Parser)]
#[command(name = "nodeadm-userdata")]
#[command(author, version, about = "Render nodeadm user data for Kubernetes worker nodes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render user data from a node config
    Render {
        /// Node config file (YAML or JSON)
        #[arg(short = 'f', long, env = "NODEADM_USERDATA_CONFIG")]
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Gzip compress the document
        #[arg(long)]
        gzip: bool,
        /// Base64 encode the (possibly compressed) document
        #[arg(long)]
        base64: bool,
    },
    /// Validate a node config and print the resolved values
    Validate {
        /// Node config file (YAML or JSON)
        #[arg(short = 'f', long, env = "NODEADM_USERDATA_CONFIG")]
        file: PathBuf,
    },
    /// List the parts of a rendered user-data document
    Inspect {
        /// Rendered user-data file
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG overrides the -v level
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Logs go to stderr so rendered output on stdout stays clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            file,
            output,
            gzip,
            base64,
        } => {
            let config = load_node_config(&file)
                .await
                .with_context(|| format!("failed to load node config {}", file.display()))?;
            let document = userdata::render(&config)?;
            let encoded = userdata::encode(&document, Encoding { gzip, base64 })?;

            userdata::write_user_data(&encoded, output.as_deref())
                .await
                .context("failed to write user data")?;
        }
        Commands::Validate { file } => {
            let config = load_node_config(&file)
                .await
                .with_context(|| format!("failed to load node config {}", file.display()))?;
            let resolved = userdata::resolve(&config)?;
            print!("{}", serde_yaml::to_string(&resolved)?);
        }
        Commands::Inspect { file } => {
            let data = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let parts = userdata::parse_multipart(&data)?;

            for (i, part) in parts.iter().enumerate() {
                println!(
                    "{}: {} ({}) {} bytes",
                    i + 1,
                    part.content_type,
                    part.filename.as_deref().unwrap_or("-"),
                    part.content.len()
                );
            }
        }
    }

    Ok(())
}
