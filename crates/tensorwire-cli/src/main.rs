//! Command-line inspector for serialized tensor records.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tensorwire_buffer::SharedBuf;
use tensorwire_codec::{Endianness, WireTensor};

/// Tensor record inspection toolkit
#[derive(Parser)]
#[command(name = "tensorwire")]
#[command(about = "Inspect serialized tensor records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header information for a record file
    Inspect {
        /// Record file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { file } => {
            println!("{}", describe(&file)?);
            Ok(())
        }
    }
}

/// Decode `path` and render its header fields for human eyes.
fn describe(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let record = WireTensor::decode(&SharedBuf::from_vec(bytes))
        .with_context(|| format!("{} is not a valid tensor record", path.display()))?;

    let order = match record.endianness {
        Endianness::Little => "little",
        Endianness::Big => "big",
        Endianness::Native => "native",
    };
    Ok(format!(
        "type:       {}\n\
         byte order: {}\n\
         shape:      {}\n\
         elements:   {}\n\
         payload:    {} bytes",
        record.data_type,
        order,
        format_shape(&record.sizes),
        record.num_elements(),
        record.payload.len(),
    ))
}

fn format_shape(sizes: &[u64]) -> String {
    let dims: Vec<String> = sizes.iter().map(u64::to_string).collect();
    format!("[{}]", dims.join(", "))
}

// ── Tests ───────────────────────────────────────────────────────────
