//! Huffman compression of text, raw bytes and images.
//!
//! A compressed file is self-describing:
//!
//! ```text
//! [<width>x<height> SEP]  [tree header] END  [packed code bits] [last byte] [valid bits in last byte]
//! ```
//!
//! The dimension prefix is only present for images, see [`header`] for the
//! tree grammar.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use log::{info, warn};

pub mod bitmanipulation;
pub mod codes;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod grid;
pub mod header;
pub mod symbol;
pub mod tree;

pub use config::{Alphabet, Config};
pub use decoder::{decompress_grid, decompress_symbols};
pub use encoder::{compress_grid, compress_symbols, CompressionStats};
pub use error::{HuffError, Result};
pub use grid::PixelGrid;
pub use symbol::Symbol;

/// Compresses the file at `input` into `output`.
///
/// The input is read completely before `output` is created. If compression
/// fails afterwards (e.g. `StreamOverflow`), the partial output is removed.
pub fn compress(
    input: &Path,
    output: &Path,
    alphabet: Alphabet,
    config: &Config,
) -> Result<CompressionStats> {
    info!("compressing {:?} as {:?}", input, alphabet);
    let max_bytes = config.max_output_bytes;
    let result = match alphabet {
        Alphabet::Text => {
            let text = fs::read_to_string(input).map_err(|e| unavailable(input, e))?;
            let symbols: Vec<char> = text.chars().collect();
            compress_symbols(&symbols, &mut create(output)?, max_bytes)
        }
        Alphabet::Bytes => {
            let symbols = fs::read(input).map_err(|e| unavailable(input, e))?;
            compress_symbols(&symbols, &mut create(output)?, max_bytes)
        }
        Alphabet::Image => {
            let grid = PixelGrid::open(input)?;
            compress_grid(&grid, &mut create(output)?, max_bytes)
        }
    };
    if result.is_err() {
        if let Err(e) = fs::remove_file(output) {
            warn!("cannot remove partial output {:?}: {}", output, e);
        }
    }
    result
}

/// Decompresses the file at `input` into `output`, returns the number of
/// decoded symbols.
pub fn decompress(input: &Path, output: &Path, alphabet: Alphabet) -> Result<usize> {
    info!("decompressing {:?} as {:?}", input, alphabet);
    let source = BufReader::new(File::open(input).map_err(|e| unavailable(input, e))?);
    match alphabet {
        Alphabet::Text => {
            let symbols: Vec<char> = decompress_symbols(source)?;
            let text: String = symbols.iter().collect();
            write(output, text.as_bytes())?;
            Ok(symbols.len())
        }
        Alphabet::Bytes => {
            let symbols: Vec<u8> = decompress_symbols(source)?;
            write(output, &symbols)?;
            Ok(symbols.len())
        }
        Alphabet::Image => {
            let grid = decompress_grid(source)?;
            grid.save(output)?;
            Ok(grid.pixels.len())
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| HuffError::DestinationUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| HuffError::DestinationUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

fn unavailable(path: &Path, source: std::io::Error) -> HuffError {
    HuffError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    }
}
