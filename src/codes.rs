use std::{collections::HashMap, fmt};

use itertools::Itertools;

use crate::{frequency::FrequencyTable, symbol::Symbol, tree::HuffmanTree};

/// Bit path of every leaf of a code tree, `false` for left and `true` for right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: HashMap<S, Vec<bool>>,
}

impl<S: Symbol> CodeTable<S> {
    pub fn new(tree: Option<&HuffmanTree<S>>) -> Self {
        let mut codes = HashMap::new();
        if let Some(tree) = tree {
            let mut path = Vec::new();
            collect_codes(tree, &mut path, &mut codes);
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: &S) -> Option<&[bool]> {
        self.codes.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &[bool])> {
        self.codes.iter().map(|(symbol, code)| (symbol, code.as_slice()))
    }

    /// Number of bits needed to encode every symbol counted in `counts`.
    pub fn encoded_len(&self, counts: &FrequencyTable<S>) -> usize {
        counts
            .iter()
            .map(|(symbol, count)| self.get(symbol).map_or(0, |code| code.len()) * count)
            .sum()
    }
}

fn collect_codes<S: Symbol>(
    tree: &HuffmanTree<S>,
    path: &mut Vec<bool>,
    codes: &mut HashMap<S, Vec<bool>>,
) {
    match tree {
        HuffmanTree::Leaf(_, symbol) => {
            codes.insert(symbol.clone(), path.clone());
        }
        HuffmanTree::Node(_, left, right) => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            if let Some(right) = right {
                path.push(true);
                collect_codes(right, path, codes);
                path.pop();
            }
        }
    }
}

pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

/// Codes sorted by length, then by value
impl<S: Symbol> fmt::Display for CodeTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self
            .iter()
            .sorted_by(|(_, a), (_, b)| a.len().cmp(&b.len()).then(a.cmp(b)))
            .map(|(symbol, code)| format!("{:?} -> {}", symbol, bits_to_string(code)))
            .join("\n");
        write!(f, "{}", lines)
    }
}
