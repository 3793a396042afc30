use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use rhuff::{compress, decompress, Alphabet, Config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    // Command to execute
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path of the input file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the output file, derived from the input when missing
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How the input is split into symbols
    #[arg(short, long, value_enum)]
    alphabet: Option<Alphabet>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum size of the compressed file, in bytes
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Compress,
    Decompress,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::new(path)?,
        None => Config::default(),
    };
    if let Some(max_bytes) = args.max_bytes {
        config.max_output_bytes = max_bytes;
    }
    let alphabet = args.alphabet.unwrap_or(config.alphabet);

    match args.command {
        Some(Commands::Compress) | None => {
            let output = args
                .output
                .unwrap_or_else(|| config.compressed_path(&args.input));
            let stats = compress(&args.input, &output, alphabet, &config)
                .with_context(|| format!("Error during compression of {:?}", args.input))?;
            info!("{:?} written, {} bytes", output, stats.total_bytes);
        }
        Some(Commands::Decompress) => {
            let output = args
                .output
                .unwrap_or_else(|| config.decompressed_path(&args.input, alphabet));
            let symbols = decompress(&args.input, &output, alphabet)
                .with_context(|| format!("Error during decompression of {:?}", args.input))?;
            info!("{:?} written, {} symbols", output, symbols);
        }
    };
    Ok(())
}
