use std::io::{self, Write};

use arch_info::{BuildTarget, write_info, write_platform};
use clap::{Parser, error::ErrorKind};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

//
// ──────────────────────────────────────────────────────────────────────────────
//  CLI ARGUMENTS
// ──────────────────────────────────────────────────────────────────────────────
//
// Run without arguments the binary prints exactly one line: the canonical
// platform string of the target it was compiled for. `--info` is a diagnostic
// view of the same embedded data. Arguments clap cannot make sense of are
// ignored: the run still prints the platform and exits 0.
//

#[derive(Parser, Debug, Default)]
#[command(version, about = "Print the platform string of the compilation target")]
pub struct Cli {
    /// Print the embedded build target details instead of the bare platform
    #[arg(long)]
    info: bool,
}

fn init_tracing() {
    // Respect RUST_LOG or default to 'off' so stderr stays empty.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .compact()
                .with_filter(filter),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    color_eyre::install().map_err(|err| anyhow::anyhow!("{err}"))?;
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            debug!(kind = ?err.kind(), "ignoring unusable arguments");
            Cli::default()
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.info {
        write_info(&mut out, &BuildTarget::current())?;
    } else {
        write_platform(&mut out)?;
    }

    out.flush()?;

    Ok(())
}
