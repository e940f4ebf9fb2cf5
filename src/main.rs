use clap::Parser;
use serial_sniff::config::{Config, ConfigLoader};
use serial_sniff::{
    logging, AppResult, Controller, ControllerConfig, SerialConnector, StdoutSink,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sniff both lines of a UART bridge and print framed traffic.",
    long_about = "Attaches to the transmit and receive ports of a UART bridge, splits each byte stream on a separator and prints every frame as a color-tagged line. Ports that are missing or drop out are retried every second until Ctrl+C."
)]
struct Args {
    /// Transmit-side uart bridge port to connect to.
    #[arg(short, long, value_name = "TX")]
    tx: String,

    /// Receive-side uart bridge port to connect to.
    #[arg(short, long, value_name = "RX")]
    rx: String,

    /// Line separator in the form of \\r, \\n, \\x00 etc [default: \n]
    #[arg(short, long)]
    separator: Option<String>,

    /// Output style, one of: utf8, bytes, pybytes [default: pybytes]
    #[arg(short, long)]
    output: Option<String>,

    /// Baud rate for both ports [default: 115200]
    #[arg(short, long)]
    baud: Option<u32>,

    /// Do not wrap lines in ANSI colors.
    #[arg(long)]
    no_color: bool,

    /// Read configuration from this file instead of the default locations.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase diagnostic verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Command-line values take precedence over file and environment.
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref separator) = self.separator {
            config.output.separator = separator.clone();
        }
        if let Some(ref output) = self.output {
            config.output.style = output.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if self.no_color {
            config.output.color = false;
        }
    }
}

// --- Main Application Entry Point ---
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> AppResult<()> {
    let loader = match args.config {
        Some(ref path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();
    args.apply_to(&mut config);

    let session = ControllerConfig::from_config(&config, &args.tx, &args.rx)?;

    if let Err(e) = logging::init(&config, args.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let controller = Controller::new(session, Arc::new(SerialConnector), Arc::new(StdoutSink));
    let summary = controller.run_until(shutdown_signal()).await.map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!(
        tx_frames = summary.tx.frames,
        rx_frames = summary.rx.frames,
        "session ended"
    );

    // Leave the shell prompt on a fresh line after ^C.
    let mut stdout = io::stdout().lock();
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

// --- Graceful Shutdown Handler ---
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
