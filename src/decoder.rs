use std::io::{BufRead, BufReader, Read};

use log::{debug, info};

use crate::{
    bitmanipulation::BitReader,
    grid::PixelGrid,
    header::{self, Dimensions, END, SEP},
    symbol::Symbol,
    tree::HuffmanTree,
    HuffError, Result,
};

/// Compressed form of an empty sequence.
const EMPTY_STREAM: [u8; 2] = [0x00, 0x00];

#[derive(Debug)]
pub struct HuffmanDecoder<S: Symbol> {
    tree: Option<HuffmanTree<S>>,
}

impl<S: Symbol> HuffmanDecoder<S> {
    pub fn new(tree: Option<HuffmanTree<S>>) -> Result<Self> {
        if let Some(HuffmanTree::Leaf(_, _)) = tree {
            return Err(HuffError::MalformedHeader(
                "the root of the tree cannot be a leaf".to_string(),
            ));
        }
        Ok(HuffmanDecoder { tree })
    }

    /// Walks the tree bit by bit until the stream is exhausted, which must
    /// happen right after a symbol.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>) -> Result<Vec<S>> {
        let root = match &self.tree {
            Some(root) => root,
            None if reader.has_next() => return Err(HuffError::InvalidCode),
            None => return Ok(Vec::new()),
        };

        let mut output = Vec::new();
        let mut current = root;
        let mut mid_code = false;
        while reader.has_next() {
            let bit = reader.read_bit()?;
            current = match current {
                HuffmanTree::Node(_, left, right) => {
                    if bit {
                        right.as_deref().ok_or(HuffError::InvalidCode)?
                    } else {
                        left.as_ref()
                    }
                }
                HuffmanTree::Leaf(_, _) => return Err(HuffError::InvalidCode),
            };
            mid_code = true;

            if let HuffmanTree::Leaf(_, symbol) = current {
                output.push(symbol.clone());
                current = root;
                mid_code = false;
            }
        }

        if mid_code {
            return Err(HuffError::TruncatedStream(
                "stream ended in the middle of a code",
            ));
        }
        Ok(output)
    }
}

/// Decompresses a stream written by [`crate::encoder::compress_symbols`].
pub fn decompress_symbols<S: Symbol, R: Read>(source: R) -> Result<Vec<S>> {
    let mut reader = BufReader::new(source);
    let tree_bytes = read_field(&mut reader, END)?;
    let tree_bytes = match tree_bytes {
        Field::Complete(bytes) => bytes,
        Field::Unterminated(bytes) if bytes == EMPTY_STREAM => return Ok(Vec::new()),
        Field::Unterminated(_) => {
            return Err(HuffError::TruncatedStream("tree header is not terminated"))
        }
    };
    decode_body(&tree_bytes, reader)
}

/// Decompresses a stream written by [`crate::encoder::compress_grid`].
pub fn decompress_grid<R: Read>(source: R) -> Result<PixelGrid> {
    let mut reader = BufReader::new(source);
    let dimensions = match read_field(&mut reader, SEP)? {
        Field::Complete(bytes) => Dimensions::parse(&bytes)?,
        Field::Unterminated(_) => {
            return Err(HuffError::TruncatedStream("image size is not terminated"))
        }
    };
    let tree_bytes = match read_field(&mut reader, END)? {
        Field::Complete(bytes) => bytes,
        Field::Unterminated(_) => {
            return Err(HuffError::TruncatedStream("tree header is not terminated"))
        }
    };
    let pixels = decode_body(&tree_bytes, reader)?;
    debug!(
        "decoded {} pixels for a {}x{} image",
        pixels.len(),
        dimensions.width,
        dimensions.height
    );
    PixelGrid::new(dimensions, pixels)
}

fn decode_body<S: Symbol, R: Read>(tree_bytes: &[u8], reader: R) -> Result<Vec<S>> {
    let tree = header::deserialize_tree(tree_bytes)?;
    let decoder = HuffmanDecoder::new(tree)?;
    let mut bits = BitReader::new(reader)?;
    let symbols = decoder.decode(&mut bits)?;
    info!("decompressed {} symbols", symbols.len());
    Ok(symbols)
}

enum Field {
    Complete(Vec<u8>),
    Unterminated(Vec<u8>),
}

/// Reads up to `delimiter`, which is consumed but not returned.
fn read_field<R: BufRead>(reader: &mut R, delimiter: u8) -> Result<Field> {
    let mut bytes = Vec::new();
    reader.read_until(delimiter, &mut bytes)?;
    if bytes.last() == Some(&delimiter) {
        bytes.pop();
        Ok(Field::Complete(bytes))
    } else {
        Ok(Field::Unterminated(bytes))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bitmanipulation::BitReader,
        decoder::{decompress_grid, decompress_symbols, HuffmanDecoder},
        frequency::count_frequencies,
        header::{CLOSE, END, OPEN, SEP},
        tree::HuffmanTree,
        HuffError,
    };

    fn header(tree: &[u8]) -> Vec<u8> {
        let mut bytes = tree.to_vec();
        bytes.push(END);
        bytes
    }

    fn abb_header() -> Vec<u8> {
        let mut tree = vec![OPEN];
        tree.extend_from_slice(b"a:1");
        tree.push(SEP);
        tree.extend_from_slice(b"b:2");
        tree.push(CLOSE);
        tree.extend_from_slice(b":3");
        header(&tree)
    }

    #[test]
    fn test_decode() {
        let counts = count_frequencies("abacba".chars());
        let decoder = HuffmanDecoder::new(HuffmanTree::create(&counts)).unwrap();

        // a c b -> 0 10 11
        let input: [u8; 2] = [0b0101_1000, 5];
        let mut reader = BitReader::new(&input[..]).unwrap();
        let output: String = decoder.decode(&mut reader).unwrap().into_iter().collect();

        assert_eq!("acb", output);
    }

    #[test]
    fn decodes_abb() {
        let mut input = abb_header();
        input.extend_from_slice(&[0b0110_0000, 3]);
        let output: Vec<char> = decompress_symbols(&input[..]).unwrap();
        assert_eq!(output, vec!['a', 'b', 'b']);
    }

    #[test]
    fn bare_empty_stream() {
        let output: Vec<char> = decompress_symbols(&[0u8, 0][..]).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn null_tree_header() {
        let mut input = header(&[OPEN, SEP, CLOSE]);
        input.extend_from_slice(&[0, 0]);
        let output: Vec<char> = decompress_symbols(&input[..]).unwrap();
        assert!(output.is_empty());

        let mut input = header(&[OPEN, SEP, CLOSE]);
        input.extend_from_slice(&[0x80, 1]);
        assert!(matches!(
            decompress_symbols::<char, _>(&input[..]),
            Err(HuffError::InvalidCode)
        ));
    }

    #[test]
    fn truncated_to_one_byte() {
        for input in [&[OPEN][..], &[0u8][..], &[][..]] {
            assert!(matches!(
                decompress_symbols::<char, _>(input),
                Err(HuffError::TruncatedStream(_))
            ));
        }
    }

    #[test]
    fn missing_trailer() {
        let mut input = abb_header();
        input.push(0b0110_0000);
        assert!(matches!(
            decompress_symbols::<char, _>(&input[..]),
            Err(HuffError::TruncatedStream(_))
        ));
    }

    #[test]
    fn ends_in_the_middle_of_a_code() {
        let counts = count_frequencies("abacba".chars());
        let mut tree = vec![];
        tree.extend(crate::header::serialize_tree(HuffmanTree::create(&counts).as_ref()));
        let mut input = header(&tree);
        // a then half of c
        input.extend_from_slice(&[0b0100_0000, 2]);
        assert!(matches!(
            decompress_symbols::<char, _>(&input[..]),
            Err(HuffError::TruncatedStream(_))
        ));
    }

    #[test]
    fn right_turn_on_single_symbol_tree() {
        let mut tree = vec![OPEN];
        tree.extend_from_slice(b"a:3");
        tree.extend_from_slice(&[SEP, CLOSE]);
        tree.extend_from_slice(b":3");
        let mut input = header(&tree);
        input.extend_from_slice(&[0b0100_0000, 2]);
        assert!(matches!(
            decompress_symbols::<char, _>(&input[..]),
            Err(HuffError::InvalidCode)
        ));
    }

    #[test]
    fn leaf_root_is_rejected() {
        let mut input = header(b"a:3");
        input.extend_from_slice(&[0, 0]);
        assert!(matches!(
            decompress_symbols::<char, _>(&input[..]),
            Err(HuffError::MalformedHeader(_))
        ));
    }

    #[test]
    fn grid_needs_dimensions() {
        let mut input = b"3x".to_vec();
        input.extend_from_slice(&abb_header());
        assert!(decompress_grid(&input[..]).is_err());

        let mut input = b"2x1".to_vec();
        input.push(SEP);
        let mut tree = vec![OPEN];
        tree.extend_from_slice(b"7:1");
        tree.push(SEP);
        tree.extend_from_slice(b"9:1");
        tree.push(CLOSE);
        tree.extend_from_slice(b":2");
        input.extend(header(&tree));
        input.extend_from_slice(&[0b0100_0000, 2]);
        let grid = decompress_grid(&input[..]).unwrap();
        assert_eq!(grid.pixels, vec![7, 9]);
    }

    #[test]
    fn grid_pixel_count_must_match() {
        let mut input = b"3x1".to_vec();
        input.push(SEP);
        let mut tree = vec![OPEN];
        tree.extend_from_slice(b"7:1");
        tree.push(SEP);
        tree.extend_from_slice(b"9:1");
        tree.push(CLOSE);
        tree.extend_from_slice(b":2");
        input.extend(header(&tree));
        input.extend_from_slice(&[0b0100_0000, 2]);
        assert!(matches!(
            decompress_grid(&input[..]),
            Err(HuffError::TruncatedStream(_))
        ));
    }
}
