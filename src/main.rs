use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shopfinder::report::{self, Format};
use shopfinder::{ReportError, ShopDirectory};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "shopfinder")]
#[command(about = "Rank registered shops by great-circle distance from a location.", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List shops nearest first from the given location
    Search {
        #[command(flatten)]
        source: ShopSource,

        /// Latitude of the reference point, in degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: String,

        /// Longitude of the reference point, in degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: String,

        /// Only report this many of the nearest shops
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        output: Output,
    },
    /// List registered shops in file order
    List {
        #[command(flatten)]
        source: ShopSource,

        #[command(flatten)]
        output: Output,
    },
}

#[derive(Args, Debug)]
struct ShopSource {
    /// CSV file with a name,latitude,longitude header
    #[arg(short, long, env = "SHOPFINDER_SHOPS")]
    shops: PathBuf,
}

#[derive(Args, Debug)]
struct Output {
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn load(source: &ShopSource) -> Result<ShopDirectory> {
    ShopDirectory::from_path(&source.shops)
        .with_context(|| format!("loading shops from {}", source.shops.display()))
}

/// Sends the report to `--out` (replaced only once fully written) or stdout.
fn emit<F>(out: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ReportError>,
{
    match out {
        Some(path) => report::write_to_path(path, |file| write(file))
            .with_context(|| format!("writing {}", path.display())),
        None => write(&mut io::stdout().lock()).context("writing report"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    shopfinder::logging::init_logging(cli.verbose).context("initializing logging")?;

    match cli.command {
        Command::Search {
            source,
            latitude,
            longitude,
            limit,
            output,
        } => {
            let directory = load(&source)?;
            let now = Instant::now();
            let ranked = directory
                .search_raw(&latitude, &longitude, limit)
                .context("invalid search location")?;
            debug!(elapsed_s = now.elapsed().as_secs_f64(), "ranked shops");

            emit(output.out.as_deref(), |out| {
                report::write_ranked(out, &ranked, output.format)
            })?;
            if let Some(path) = &output.out {
                info!("Wrote {} shops to {}", ranked.len(), path.display());
            }
        }
        Command::List { source, output } => {
            let directory = load(&source)?;
            emit(output.out.as_deref(), |out| {
                report::write_shops(out, directory.shops(), output.format)
            })?;
            if let Some(path) = &output.out {
                info!("Wrote {} shops to {}", directory.len(), path.display());
            }
        }
    }

    Ok(())
}
