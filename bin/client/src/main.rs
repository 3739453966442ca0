//! Upload client

mod logger;

use clap::{Parser, Subcommand};
use client::constants::DEFAULT_SERVER_URL;
use client::{ClientConfig, Transmitter};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Upload files to the upload receiver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, or every file below a directory
    Send {
        /// File or directory to upload; its parent is the base of the uploaded paths
        path: PathBuf,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        server: String,
        /// Request timeout in seconds (default: wait indefinitely)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            path,
            server,
            timeout_secs,
        } => {
            let config =
                ClientConfig::new(server).with_timeout(timeout_secs.map(Duration::from_secs));
            let transmitter = Arc::new(Transmitter::new(&config)?);

            let (tx, rx) = mpsc::channel::<String>();
            let handle = transmitter.spawn(path, tx)?;

            // Ends once the transfer thread drops its sender
            for status in rx {
                println!("{}", status);
            }

            let result = handle
                .join()
                .map_err(|_| anyhow::anyhow!("Transfer thread panicked"))?;
            if result.is_err() {
                anyhow::bail!("Transfer failed");
            }
        }
    }

    Ok(())
}
