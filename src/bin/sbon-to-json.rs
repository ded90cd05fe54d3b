//! Converts an SBON document to indented JSON.
//!
//! Reads from INFILE (or stdin) and writes to OUTFILE (or stdout).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

#[derive(Parser)]
#[command(name = "sbon-to-json")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert an SBON document to JSON", long_about = None)]
struct Cli {
    /// SBON input file. Reads stdin when omitted.
    input: Option<PathBuf>,
    /// JSON output file. Writes stdout when omitted.
    output: Option<PathBuf>,
    /// Log cursor activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("sbon-to-json: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    init_logging(cli.verbose)?;

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut output = BufWriter::new(output);

    let decoder = sbon::decode(input);
    sbon::json::write_json(decoder.reader(), &mut output).context("conversion failed")?;
    output.write_all(b"\n")?;
    output.flush()?;

    debug!("conversion finished");
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}
