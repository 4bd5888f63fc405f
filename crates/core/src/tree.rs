//! Length-limited Huffman code trees.
//!
//! Construction runs in three steps:
//!
//! 1. **Code lengths**: a standard Huffman merge over a min-heap keyed by
//!    `(frequency, arrival order)`. If the deepest leaf exceeds the bit
//!    budget, lengths are recomputed with package-merge, which yields the
//!    optimal lengths under the limit.
//! 2. **Canonical codes**: symbols are ordered by `(length, symbol)` and
//!    assigned consecutive codes, so the result depends only on the alphabet.
//! 3. **Decode tree**: the codes are threaded into a binary tree stored as a
//!    flat node arena (0 = left, 1 = right, root at index 0).
//!
//! # Invariants
//! - Exactly one leaf per alphabet symbol
//! - No code is a prefix of another
//! - Every code length is in `1..=max_bits`

use crate::alphabet::{Alphabet, CodedSymbol, Symbol};
use crate::bitio::{BitReader, BitWriter};
use crate::error::{AlphabetError, HuffmanError, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use tracing::{debug, trace};

/// Longest code length the builder accepts.
pub const MAX_CODE_BITS: u8 = 32;

/// Index of the root node in the arena.
const ROOT: usize = 0;

/// A Huffman code: bit pattern (right-aligned) and its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u32,
    length: u8,
}

impl Code {
    pub fn new(bits: u32, length: u8) -> Self {
        Self { bits, length }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Write this code's bits, MSB first.
    pub fn write(&self, writer: &mut BitWriter) -> Result<()> {
        writer.write_bits(u64::from(self.bits), self.length as usize)
    }

    /// True if this code's bits are a leading run of `other`'s bits.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        let shift = u32::from(other.length.saturating_sub(self.length));
        self.length <= other.length && other.bits.checked_shr(shift).unwrap_or(0) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.length as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Branch([Option<usize>; 2]),
    Leaf(usize),
}

/// A Huffman code tree and the code assigned to each of its symbols.
#[derive(Debug, Clone)]
pub struct Tree<S> {
    /// Leaf payloads, in alphabet order
    symbols: Vec<CodedSymbol<S>>,
    /// Code for each symbol, parallel to `symbols`
    codes: Vec<Code>,
    /// Decode tree arena
    nodes: Vec<Node>,
    escape: Option<usize>,
    length_limited: bool,
}

impl<S: Symbol> Tree<S> {
    /// Build a tree where no code is longer than `max_bits`.
    ///
    /// # Errors
    /// - `HuffmanError::InvalidMaxBits` if `max_bits` is 0 or above [`MAX_CODE_BITS`]
    /// - `AlphabetError::TooFewSymbols` for alphabets of fewer than two symbols
    /// - `HuffmanError::AlphabetTooLarge` if there are more symbols than
    ///   `max_bits`-bit codes
    pub fn build(alphabet: &Alphabet<S>, max_bits: u8) -> Result<Self> {
        if !(1..=MAX_CODE_BITS).contains(&max_bits) {
            return Err(HuffmanError::InvalidMaxBits { bits: max_bits }.into());
        }

        let count = alphabet.len();
        if count < 2 {
            return Err(AlphabetError::TooFewSymbols { count }.into());
        }
        if count as u64 > 1u64 << max_bits {
            return Err(HuffmanError::AlphabetTooLarge {
                symbols: count,
                max_bits,
            }
            .into());
        }

        let weights: Vec<u64> = alphabet.symbols().iter().map(CodedSymbol::frequency).collect();

        let mut lengths = huffman_lengths(&weights);
        let height = lengths.iter().copied().max().unwrap_or(0);
        let length_limited = height > u32::from(max_bits);
        if length_limited {
            trace!(
                "huffman tree height {} exceeds {} bits, applying package-merge",
                height,
                max_bits
            );
            lengths = package_merge(&weights, max_bits).ok_or(HuffmanError::AlphabetTooLarge {
                symbols: count,
                max_bits,
            })?;
        }

        let codes = canonical_codes(&lengths);
        let nodes = thread_codes(&codes);

        let tree = Self {
            symbols: alphabet.symbols().to_vec(),
            codes,
            nodes,
            escape: alphabet.escape_index(),
            length_limited,
        };

        debug!(
            "built code tree: {} symbols, height {}, length limited: {}",
            count,
            tree.height(),
            length_limited
        );

        Ok(tree)
    }
}

impl<S> Tree<S> {
    /// Walk from the root one bit at a time until a leaf is reached.
    ///
    /// Returns the leaf's symbol index, or `None` if the reader runs out of
    /// bits before a complete code has been read.
    pub fn decode_index(&self, reader: &mut BitReader<'_>) -> Option<usize> {
        let mut node = ROOT;
        loop {
            match self.nodes[node] {
                Node::Leaf(symbol) => return Some(symbol),
                Node::Branch(children) => {
                    let bit = reader.read_bit().ok()?;
                    node = children[usize::from(bit)]?;
                }
            }
        }
    }

    /// Decode one symbol, see [`Tree::decode_index`].
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Option<&CodedSymbol<S>> {
        self.decode_index(reader).map(|index| &self.symbols[index])
    }

    /// Length of the longest code.
    pub fn height(&self) -> u8 {
        self.codes.iter().map(Code::length).max().unwrap_or(0)
    }

    pub fn symbols(&self) -> &[CodedSymbol<S>] {
        &self.symbols
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn code(&self, index: usize) -> Code {
        self.codes[index]
    }

    pub fn escape_index(&self) -> Option<usize> {
        self.escape
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True if plain Huffman lengths had to be cut down to fit the budget.
    pub fn is_length_limited(&self) -> bool {
        self.length_limited
    }
}

/// Unrestricted Huffman code lengths.
///
/// Equal weights are merged in arrival order: leaves in alphabet order,
/// then internal nodes in creation order.
fn huffman_lengths(weights: &[u64]) -> Vec<u32> {
    let count = weights.len();

    // parent[i] of every node; children are always created before parents
    let mut parent: Vec<usize> = vec![usize::MAX; count];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = weights
        .iter()
        .enumerate()
        .map(|(node, &weight)| Reverse((weight, node)))
        .collect();

    while heap.len() > 1 {
        let (Some(Reverse((left_weight, left))), Some(Reverse((right_weight, right)))) =
            (heap.pop(), heap.pop())
        else {
            break;
        };

        let node = parent.len();
        parent.push(usize::MAX);
        parent[left] = node;
        parent[right] = node;
        heap.push(Reverse((left_weight.saturating_add(right_weight), node)));
    }

    // Root is the last node created; depths propagate downwards
    let root = parent.len() - 1;
    let mut depth = vec![0u32; parent.len()];
    for node in (0..root).rev() {
        depth[node] = depth[parent[node]] + 1;
    }

    depth.truncate(count);
    depth
}

#[derive(Debug, Clone, Copy)]
enum Coin {
    Leaf(usize),
    Package(usize, usize),
}

/// Optimal code lengths with no length above `max_bits` (package-merge).
///
/// Returns `None` if the symbols cannot fit, which the caller has already
/// ruled out by checking `count <= 2^max_bits`.
fn package_merge(weights: &[u64], max_bits: u8) -> Option<Vec<u32>> {
    let count = weights.len();

    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by_key(|&symbol| (weights[symbol], symbol));

    // Arena of (weight, coin); lists hold arena indices sorted by weight
    let mut arena: Vec<(u64, Coin)> = order
        .iter()
        .map(|&symbol| (weights[symbol], Coin::Leaf(symbol)))
        .collect();
    let leaves: Vec<usize> = (0..count).collect();

    let mut list = leaves.clone();
    for level in 1..max_bits {
        let mut packages = Vec::with_capacity(list.len() / 2);
        for pair in list.chunks_exact(2) {
            let weight = arena[pair[0]].0.saturating_add(arena[pair[1]].0);
            packages.push(arena.len());
            arena.push((weight, Coin::Package(pair[0], pair[1])));
        }

        // Stable merge: leaves win ties
        let mut merged = Vec::with_capacity(leaves.len() + packages.len());
        let (mut l, mut p) = (0, 0);
        while l < leaves.len() || p < packages.len() {
            let take_leaf = p == packages.len()
                || (l < leaves.len() && arena[leaves[l]].0 <= arena[packages[p]].0);
            if take_leaf {
                merged.push(leaves[l]);
                l += 1;
            } else {
                merged.push(packages[p]);
                p += 1;
            }
        }
        trace!("package-merge level {}: {} coins", level, merged.len());
        list = merged;
    }

    let selected = 2 * count - 2;
    if list.len() < selected {
        return None;
    }

    let mut lengths = vec![0u32; count];
    let mut stack: Vec<usize> = list[..selected].to_vec();
    while let Some(coin) = stack.pop() {
        match arena[coin].1 {
            Coin::Leaf(symbol) => lengths[symbol] += 1,
            Coin::Package(first, second) => {
                stack.push(first);
                stack.push(second);
            }
        }
    }

    Some(lengths)
}

/// Assign canonical codes: shorter codes first, ties in symbol order.
fn canonical_codes(lengths: &[u32]) -> Vec<Code> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by_key(|&symbol| (lengths[symbol], symbol));

    let mut codes = vec![Code::new(0, 0); lengths.len()];
    let mut next: u64 = 0;
    let mut previous_length = 0;
    for symbol in order {
        let length = lengths[symbol];
        next <<= length - previous_length;
        codes[symbol] = Code::new(next as u32, length as u8);
        next += 1;
        previous_length = length;
    }
    codes
}

/// Thread codes into a decode tree arena.
fn thread_codes(codes: &[Code]) -> Vec<Node> {
    let mut nodes = vec![Node::Branch([None, None])];
    for (symbol, code) in codes.iter().enumerate() {
        let mut node = ROOT;
        for depth in (0..code.length()).rev() {
            let bit = ((code.bits() >> depth) & 1) as usize;
            let Node::Branch(children) = nodes[node] else {
                unreachable!("canonical codes are prefix-free");
            };
            let child = match children[bit] {
                Some(child) => child,
                None => {
                    let child = nodes.len();
                    nodes.push(if depth == 0 {
                        Node::Leaf(symbol)
                    } else {
                        Node::Branch([None, None])
                    });
                    if let Node::Branch(children) = &mut nodes[node] {
                        children[bit] = Some(child);
                    }
                    child
                }
            };
            node = child;
        }
    }
    nodes
}
