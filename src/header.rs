//! Linear text form of the code tree, written ahead of the packed bits.
//!
//! ```text
//! tree := OPEN [tree] SEP [tree] CLOSE ":" frequency   internal node
//!       | symbol ":" frequency                         leaf
//!       | OPEN SEP CLOSE                               no tree
//! ```
//!
//! The header ends with `END`. Images prefix it with `<width>x<height>SEP`.

use itertools::Itertools;

use crate::{symbol::Symbol, tree::HuffmanTree, HuffError, Result};

pub const END: u8 = 0x1C;
pub const OPEN: u8 = 0x1D;
pub const SEP: u8 = 0x1E;
pub const CLOSE: u8 = 0x1F;

/// Deepest node accepted when parsing. Huffman codes of inputs with at most
/// `usize::MAX` symbols never get longer than about 90 bits.
pub const MAX_DEPTH: usize = 128;

/// Size of a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `<width>x<height>`, without the trailing `SEP`
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}x{}", self.width, self.height).into_bytes()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| HuffError::MalformedHeader("dimensions are not text".to_string()))?;
        let (width, height) = text
            .split('x')
            .map(|n| n.parse::<u32>())
            .collect_tuple()
            .ok_or_else(|| HuffError::MalformedHeader(format!("bad dimensions {:?}", text)))?;
        match (width, height) {
            (Ok(width), Ok(height)) => Ok(Dimensions { width, height }),
            _ => Err(HuffError::MalformedHeader(format!(
                "bad dimensions {:?}",
                text
            ))),
        }
    }
}

pub fn serialize_tree<S: Symbol>(tree: Option<&HuffmanTree<S>>) -> Vec<u8> {
    match tree {
        None => vec![OPEN, SEP, CLOSE],
        Some(tree) => {
            let mut out = Vec::new();
            write_tree(tree, &mut out);
            out
        }
    }
}

fn write_tree<S: Symbol>(tree: &HuffmanTree<S>, out: &mut Vec<u8>) {
    match tree {
        HuffmanTree::Leaf(count, symbol) => {
            let mut label = String::new();
            symbol.write_label(&mut label);
            out.extend_from_slice(label.as_bytes());
            out.extend_from_slice(format!(":{}", count).as_bytes());
        }
        HuffmanTree::Node(count, left, right) => {
            out.push(OPEN);
            write_tree(left, out);
            out.push(SEP);
            if let Some(right) = right {
                write_tree(right, out);
            }
            out.push(CLOSE);
            out.extend_from_slice(format!(":{}", count).as_bytes());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Sep,
    Close,
    Text(&'a [u8]),
}

fn tokenize(bytes: &[u8]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let delimiter = match b {
            OPEN => Token::Open,
            SEP => Token::Sep,
            CLOSE => Token::Close,
            _ => continue,
        };
        if start < i {
            tokens.push(Token::Text(&bytes[start..i]));
        }
        tokens.push(delimiter);
        start = i + 1;
    }
    if start < bytes.len() {
        tokens.push(Token::Text(&bytes[start..]));
    }
    tokens
}

/// Parses a header produced by [`serialize_tree`], `END` excluded.
pub fn deserialize_tree<S: Symbol>(bytes: &[u8]) -> Result<Option<HuffmanTree<S>>> {
    let tokens = tokenize(bytes);
    if tokens == [Token::Open, Token::Sep, Token::Close] {
        return Ok(None);
    }
    let (tree, pos) = parse_tree(&tokens, 0, 0)?;
    if pos != tokens.len() {
        return Err(HuffError::MalformedHeader(format!(
            "unexpected token after the tree at {}",
            pos
        )));
    }
    Ok(Some(tree))
}

fn parse_tree<S: Symbol>(
    tokens: &[Token],
    pos: usize,
    depth: usize,
) -> Result<(HuffmanTree<S>, usize)> {
    if depth > MAX_DEPTH {
        return Err(HuffError::MalformedHeader(format!(
            "tree deeper than {} levels",
            MAX_DEPTH
        )));
    }
    match tokens.get(pos) {
        Some(Token::Open) => {
            let (left, pos) = parse_tree(tokens, pos + 1, depth + 1)?;
            let pos = expect(tokens, pos, Token::Sep)?;
            let (right, pos) = match tokens.get(pos) {
                Some(Token::Close) => (None, pos),
                _ => {
                    let (right, pos) = parse_tree(tokens, pos, depth + 1)?;
                    (Some(Box::new(right)), pos)
                }
            };
            let pos = expect(tokens, pos, Token::Close)?;
            let pos = match tokens.get(pos) {
                Some(Token::Text(text)) => {
                    parse_count(text.strip_prefix(b":").unwrap_or(b""))?;
                    pos + 1
                }
                _ => return Err(missing("node frequency", pos)),
            };
            let count = left
                .value()
                .checked_add(right.as_ref().map_or(0, |r| r.value()))
                .ok_or_else(|| HuffError::MalformedHeader("frequency overflow".to_string()))?;
            Ok((HuffmanTree::Node(count, Box::new(left), right), pos))
        }
        Some(Token::Text(text)) => Ok((parse_leaf(text)?, pos + 1)),
        _ => Err(missing("subtree", pos)),
    }
}

fn parse_leaf<S: Symbol>(text: &[u8]) -> Result<HuffmanTree<S>> {
    let text = std::str::from_utf8(text)
        .map_err(|_| HuffError::MalformedHeader("leaf is not valid UTF-8".to_string()))?;
    let (label, count) = text
        .rsplit_once(':')
        .ok_or_else(|| HuffError::MalformedHeader(format!("leaf {:?} has no frequency", text)))?;
    let symbol = S::parse_label(label)
        .ok_or_else(|| HuffError::MalformedHeader(format!("invalid symbol {:?}", label)))?;
    Ok(HuffmanTree::Leaf(parse_count(count.as_bytes())?, symbol))
}

fn parse_count(digits: &[u8]) -> Result<usize> {
    std::str::from_utf8(digits)
        .ok()
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| {
            HuffError::MalformedHeader(format!(
                "invalid frequency {:?}",
                String::from_utf8_lossy(digits)
            ))
        })
}

fn expect<'a>(tokens: &[Token<'a>], pos: usize, expected: Token<'a>) -> Result<usize> {
    match tokens.get(pos) {
        Some(token) if *token == expected => Ok(pos + 1),
        _ => Err(missing(&format!("{:?}", expected), pos)),
    }
}

fn missing(what: &str, pos: usize) -> HuffError {
    HuffError::MalformedHeader(format!("expected {} at token {}", what, pos))
}
