use std::collections::HashMap;

use crate::symbol::Symbol;

/// Occurrence count of every distinct symbol of an input.
///
/// Symbols are kept in first-seen order, which is the order the tree
/// builder uses to break ties between equal counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: Vec<(S, usize)>,
    index: HashMap<S, usize>,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        FrequencyTable {
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, symbol: S) {
        match self.index.get(&symbol).copied() {
            Some(position) => self.counts[position].1 += 1,
            None => {
                self.index.insert(symbol.clone(), self.counts.len());
                self.counts.push((symbol, 1));
            }
        }
    }

    pub fn get(&self, symbol: &S) -> Option<usize> {
        self.index.get(symbol).map(|&position| self.counts[position].1)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of counted symbols, repetitions included
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> {
        self.counts.iter().map(|(symbol, count)| (symbol, *count))
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for symbol in iter {
            table.add(symbol);
        }
        table
    }
}

pub fn count_frequencies<S: Symbol, I: IntoIterator<Item = S>>(symbols: I) -> FrequencyTable<S> {
    symbols.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use crate::frequency::{count_frequencies, FrequencyTable};

    fn assert_counts(table: FrequencyTable<char>, expected: Vec<(char, usize)>) {
        let actual: Vec<(char, usize)> = table.iter().map(|(c, n)| (*c, n)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_count_frequencies() {
        assert_counts(count_frequencies("aa".chars()), vec![('a', 2)]);
        assert_counts(
            count_frequencies("hello, I'm testing".chars()),
            vec![
                ('h', 1),
                ('e', 2),
                ('l', 2),
                ('o', 1),
                (',', 1),
                (' ', 2),
                ('I', 1),
                ('\'', 1),
                ('m', 1),
                ('t', 2),
                ('s', 1),
                ('i', 1),
                ('n', 1),
                ('g', 1),
            ],
        );
    }

    #[test]
    fn empty_input() {
        let table = count_frequencies(Vec::<u8>::new());
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn lookup_and_total() {
        let table = count_frequencies(vec![7u32, 3, 7, 7]);
        assert_eq!(table.get(&7), Some(3));
        assert_eq!(table.get(&3), Some(1));
        assert_eq!(table.get(&5), None);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 4);
    }
}
