use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{frequency::FrequencyTable, symbol::Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanTree<S> {
    Node(usize, Box<HuffmanTree<S>>, Option<Box<HuffmanTree<S>>>),
    Leaf(usize, S),
}

impl<S: Symbol> HuffmanTree<S> {
    /// Builds the code tree of `counts`, `None` when there is nothing to encode.
    ///
    /// The two least frequent subtrees are merged until one is left. Equal
    /// counts are resolved by insertion order: leaves in first-seen order,
    /// then merged nodes in creation order. The earlier one becomes the left
    /// child.
    ///
    /// A lone symbol is wrapped in a node without right child, so that its
    /// code is `0` instead of empty.
    pub fn create(counts: &FrequencyTable<S>) -> Option<HuffmanTree<S>> {
        let mut heap: BinaryHeap<Pending<S>> = counts
            .iter()
            .enumerate()
            .map(|(order, (symbol, count))| Pending {
                order,
                tree: HuffmanTree::Leaf(count, symbol.clone()),
            })
            .collect();

        if heap.len() == 1 {
            return heap.pop().map(|single| {
                HuffmanTree::Node(single.tree.value(), Box::new(single.tree), None)
            });
        }

        let mut order = heap.len();
        while heap.len() > 1 {
            if let (Some(left), Some(right)) = (heap.pop(), heap.pop()) {
                heap.push(Pending {
                    order,
                    tree: HuffmanTree::Node(
                        left.tree.value() + right.tree.value(),
                        Box::new(left.tree),
                        Some(Box::new(right.tree)),
                    ),
                });
                order += 1;
            }
        }
        heap.pop().map(|root| root.tree)
    }
}

impl<S> HuffmanTree<S> {
    pub fn value(&self) -> usize {
        match self {
            HuffmanTree::Leaf(count, _) => *count,
            HuffmanTree::Node(count, _, _) => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanTree::Leaf(_, _))
    }

    pub fn leaves(&self) -> usize {
        match self {
            HuffmanTree::Leaf(_, _) => 1,
            HuffmanTree::Node(_, left, right) => {
                left.leaves() + right.as_ref().map_or(0, |right| right.leaves())
            }
        }
    }

    /// Same nodes and same symbols in the same places, counts ignored.
    pub fn same_shape(&self, other: &HuffmanTree<S>) -> bool
    where
        S: PartialEq,
    {
        match (self, other) {
            (HuffmanTree::Leaf(_, a), HuffmanTree::Leaf(_, b)) => a == b,
            (HuffmanTree::Node(_, l1, r1), HuffmanTree::Node(_, l2, r2)) => {
                l1.same_shape(l2)
                    && match (r1, r2) {
                        (Some(r1), Some(r2)) => r1.same_shape(r2),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

/// Heap entry: a subtree plus its insertion number.
struct Pending<S> {
    order: usize,
    tree: HuffmanTree<S>,
}

impl<S> Ord for Pending<S> {
    // Reversed, BinaryHeap pops the maximum
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .tree
            .value()
            .cmp(&self.tree.value())
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<S> PartialOrd for Pending<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for Pending<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Pending<S> {}

#[cfg(test)]
mod tests {
    use crate::{frequency::count_frequencies, tree::HuffmanTree};

    fn sums_are_consistent<S>(tree: &HuffmanTree<S>) -> bool {
        match tree {
            HuffmanTree::Leaf(count, _) => *count > 0,
            HuffmanTree::Node(count, left, right) => {
                let right_value = right.as_ref().map_or(0, |r| r.value());
                *count == left.value() + right_value
                    && sums_are_consistent(left)
                    && right.as_ref().map_or(true, |r| sums_are_consistent(r))
            }
        }
    }

    #[test]
    fn test_create_huffman_tree() {
        let counts = count_frequencies("abacba".chars());
        let tree = HuffmanTree::create(&counts).unwrap();
        assert_eq!(
            tree,
            HuffmanTree::Node(
                6,
                Box::new(HuffmanTree::Leaf(3, 'a')),
                Some(Box::new(HuffmanTree::Node(
                    3,
                    Box::new(HuffmanTree::Leaf(1, 'c')),
                    Some(Box::new(HuffmanTree::Leaf(2, 'b')))
                )))
            )
        );
    }

    #[test]
    fn empty_input_has_no_tree() {
        let counts = count_frequencies("".chars());
        assert_eq!(HuffmanTree::create(&counts), None);
    }

    #[test]
    fn single_symbol_is_wrapped() {
        let counts = count_frequencies("aaa".chars());
        let tree = HuffmanTree::create(&counts).unwrap();
        assert_eq!(
            tree,
            HuffmanTree::Node(3, Box::new(HuffmanTree::Leaf(3, 'a')), None)
        );
        assert_eq!(tree.leaves(), 1);
    }

    #[test]
    fn two_symbols_merge_once() {
        let counts = count_frequencies("abb".chars());
        let tree = HuffmanTree::create(&counts).unwrap();
        assert_eq!(
            tree,
            HuffmanTree::Node(
                3,
                Box::new(HuffmanTree::Leaf(1, 'a')),
                Some(Box::new(HuffmanTree::Leaf(2, 'b')))
            )
        );
    }

    #[test]
    fn equal_counts_follow_first_seen_order() {
        let counts = count_frequencies("dcba".chars());
        let tree = HuffmanTree::create(&counts).unwrap();
        assert_eq!(
            tree,
            HuffmanTree::Node(
                4,
                Box::new(HuffmanTree::Node(
                    2,
                    Box::new(HuffmanTree::Leaf(1, 'd')),
                    Some(Box::new(HuffmanTree::Leaf(1, 'c')))
                )),
                Some(Box::new(HuffmanTree::Node(
                    2,
                    Box::new(HuffmanTree::Leaf(1, 'b')),
                    Some(Box::new(HuffmanTree::Leaf(1, 'a')))
                )))
            )
        );
    }

    #[test]
    fn every_symbol_gets_one_leaf() {
        let text = "the quick brown fox jumps over the lazy dog";
        let counts = count_frequencies(text.chars());
        let tree = HuffmanTree::create(&counts).unwrap();
        assert_eq!(tree.leaves(), counts.len());
        assert_eq!(tree.value(), text.chars().count());
        assert!(sums_are_consistent(&tree));
    }

    #[test]
    fn construction_is_reproducible() {
        let text = "mississippi river banks";
        let first = HuffmanTree::create(&count_frequencies(text.chars()));
        let second = HuffmanTree::create(&count_frequencies(text.chars()));
        assert_eq!(first, second);
    }
}
