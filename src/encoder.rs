use std::io::Write;

use log::{debug, info};

use crate::{
    bitmanipulation::BitWriter,
    codes::CodeTable,
    frequency::{count_frequencies, FrequencyTable},
    grid::PixelGrid,
    header::{self, Dimensions, END, SEP},
    symbol::Symbol,
    tree::HuffmanTree,
    HuffError, Result,
};

/// Numbers describing one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionStats {
    pub symbols: usize,
    pub distinct_symbols: usize,
    pub header_bytes: usize,
    pub encoded_bits: usize,
    pub total_bytes: usize,
}

pub struct HuffmanEncoder<S: Symbol> {
    tree: Option<HuffmanTree<S>>,
    codes: CodeTable<S>,
}

impl<S: Symbol> HuffmanEncoder<S> {
    pub fn new(counts: &FrequencyTable<S>) -> Self {
        let tree = HuffmanTree::create(counts);
        let codes = CodeTable::new(tree.as_ref());
        HuffmanEncoder { tree, codes }
    }

    pub fn tree(&self) -> Option<&HuffmanTree<S>> {
        self.tree.as_ref()
    }

    pub fn codes(&self) -> &CodeTable<S> {
        &self.codes
    }

    /// Tree header with its `END` marker, preceded by the grid size if any.
    pub fn header(&self, dimensions: Option<Dimensions>) -> Vec<u8> {
        let mut bytes = Vec::new();
        if let Some(dimensions) = dimensions {
            bytes.extend(dimensions.to_bytes());
            bytes.push(SEP);
        }
        bytes.extend(header::serialize_tree(self.tree.as_ref()));
        bytes.push(END);
        bytes
    }

    pub fn encode<W: Write>(&self, symbols: &[S], writer: &mut BitWriter<W>) -> Result<()> {
        for symbol in symbols {
            let code = self
                .codes
                .get(symbol)
                .ok_or_else(|| HuffError::UnknownSymbol(format!("{:?}", symbol)))?;
            writer.write(code)?;
        }
        Ok(())
    }
}

/// Compresses a symbol sequence into `sink`.
///
/// An empty sequence is written as the bare two byte trailer.
pub fn compress_symbols<S: Symbol, W: Write>(
    symbols: &[S],
    sink: &mut W,
    max_bytes: usize,
) -> Result<CompressionStats> {
    if symbols.is_empty() {
        let total_bytes = BitWriter::with_max_bytes(sink, max_bytes).close()?;
        return Ok(CompressionStats {
            total_bytes,
            ..Default::default()
        });
    }
    compress(symbols, None, sink, max_bytes)
}

/// Compresses the pixels of `grid`, prefixed by its dimensions.
pub fn compress_grid<W: Write>(
    grid: &PixelGrid,
    sink: &mut W,
    max_bytes: usize,
) -> Result<CompressionStats> {
    compress(&grid.pixels, Some(grid.dimensions), sink, max_bytes)
}

fn compress<S: Symbol, W: Write>(
    symbols: &[S],
    dimensions: Option<Dimensions>,
    sink: &mut W,
    max_bytes: usize,
) -> Result<CompressionStats> {
    let counts = count_frequencies(symbols.iter().cloned());
    let encoder = HuffmanEncoder::new(&counts);
    debug!("code table:\n{}", encoder.codes());

    let mut writer = BitWriter::with_max_bytes(sink, max_bytes);
    let header = encoder.header(dimensions);
    writer.write_bytes(&header)?;
    encoder.encode(symbols, &mut writer)?;
    let encoded_bits = writer.bits_written();
    let total_bytes = writer.close()?;

    let stats = CompressionStats {
        symbols: symbols.len(),
        distinct_symbols: counts.len(),
        header_bytes: header.len(),
        encoded_bits,
        total_bytes,
    };
    info!(
        "compressed {} symbols ({} distinct) into {} bytes, header {} bytes",
        stats.symbols, stats.distinct_symbols, stats.total_bytes, stats.header_bytes
    );
    Ok(stats)
}
