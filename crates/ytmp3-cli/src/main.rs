mod args;
mod commands;

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() -> Result<()> {
    // stdout is reserved for the result line
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ytmp3=info,ytmp3_core=info")),
        )
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match commands::extract::run(std::env::args_os()).await {
        Ok(output) => {
            println!("Successfully wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprint!("{}", commands::extract::failure_message(&e));
            ExitCode::FAILURE
        }
    }
}
