//! Table-driven, byte-at-a-time Huffman decoding.
//!
//! Walking the code tree costs a branch per bit. Instead, for every context
//! the decoder can be in between bytes, a table of 256 entries records what
//! the next byte decodes to:
//!
//! - the **prefix** is the run of bits left over from earlier bytes that has
//!   not yet formed a complete code (empty for the root table)
//! - entry `v` of the table for prefix `p` holds every symbol decoded from the
//!   window `p ++ bits(v)`, plus the table for the bits left over at the end
//!   of that window
//!
//! Leftover bits are always a proper prefix of some code, i.e. an internal
//! node of the code tree, so there are at most `symbols - 1` tables.
//!
//! # Construction
//!
//! Tables live in an arena owned by the decoder and refer to each other by
//! [`TableId`]. A work queue of prefixes drives construction: computing a
//! table discovers the prefixes its entries transition to, and each prefix
//! seen for the first time is allocated and queued. The whole graph exists
//! before the first decode call and is never modified afterwards, so a
//! decoder can be shared across threads.
//!
//! See "Fast Huffman Decoding" (Hashemian) for the original table scheme.

use crate::alphabet::Symbol;
use crate::bitio::BitReader;
use crate::bytes::ByteReader;
use crate::error::Result;
use crate::stream::{Directive, SymbolConsumer};
use crate::tree::Tree;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, trace};

/// Entries per table, one per byte value.
const ENTRIES: usize = 256;

/// Leftover bits carried from one input byte to the next.
///
/// Two prefixes are the same context only if both the bits and the length
/// match: `0` and `00` lead to different tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Prefix {
    bits: u32,
    length: u8,
}

impl Prefix {
    /// The root table's context.
    pub const EMPTY: Prefix = Prefix { bits: 0, length: 0 };

    pub fn new(bits: u32, length: u8) -> Self {
        Self { bits, length }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn length(&self) -> u8 {
        self.length
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.bits, width = self.length as usize)
    }
}

/// Handle to a table in the decoder's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    pub const ROOT: TableId = TableId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// What one input byte decodes to in a given context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Symbol indices, in decode order
    symbols: Vec<usize>,
    next: TableId,
}

impl Entry {
    /// Indices of the symbols fully decoded by this byte.
    pub fn symbols(&self) -> &[usize] {
        &self.symbols
    }

    /// Table to use for the following byte.
    pub fn next(&self) -> TableId {
        self.next
    }
}

/// The 256 entries for one prefix.
#[derive(Debug, Clone)]
pub struct Table {
    prefix: Prefix,
    entries: Vec<Entry>,
}

impl Table {
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn entry(&self, byte: u8) -> &Entry {
        &self.entries[byte as usize]
    }
}

/// Byte-at-a-time decoder built once from a code tree.
#[derive(Debug, Clone)]
pub struct FastDecoder<S> {
    /// Symbol values by index
    values: Vec<S>,
    escape: Option<usize>,
    tables: Vec<Table>,
    by_prefix: HashMap<Prefix, TableId>,
}

impl<S: Symbol> FastDecoder<S> {
    /// Precompute every table reachable from the root.
    pub fn new(tree: &Tree<S>) -> Self {
        let mut builder = TableBuilder::default();
        builder.table_for(Prefix::EMPTY);

        while let Some(id) = builder.queue.pop_front() {
            let prefix = builder.tables[id.0].prefix;
            trace!("computing decode table for prefix '{}'", prefix);

            let mut entries = Vec::with_capacity(ENTRIES);
            for byte in 0..=u8::MAX {
                let (symbols, rest) = decode_window(tree, prefix, byte);
                let next = builder.table_for(rest);
                entries.push(Entry { symbols, next });
            }
            builder.tables[id.0].entries = entries;
        }

        debug!("built {} decode tables for {} symbols", builder.tables.len(), tree.len());

        Self {
            values: tree.symbols().iter().map(|symbol| symbol.value().clone()).collect(),
            escape: tree.escape_index(),
            tables: builder.tables,
            by_prefix: builder.by_prefix,
        }
    }
}

impl<S> FastDecoder<S> {
    /// Decode `input` a byte at a time, feeding symbols to `consumer`.
    ///
    /// On the escape symbol the consumer reads the raw value straight from
    /// `input`, any symbols left in the current entry are discarded (they are
    /// padding) and decoding restarts from the root table at the following
    /// byte. Stops when the consumer returns [`Directive::Stop`], leaving
    /// `input` positioned after the byte that held the last symbol.
    pub fn decode<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<S> + ?Sized,
    {
        let mut table = &self.tables[TableId::ROOT.0];
        let mut ordinal = 0;

        'bytes: while let Some(byte) = input.next_byte() {
            let entry = &table.entries[byte as usize];
            for &symbol in &entry.symbols {
                if Some(symbol) == self.escape {
                    if consumer.on_escape(input)? == Directive::Stop {
                        return Ok(());
                    }
                    table = &self.tables[TableId::ROOT.0];
                    continue 'bytes;
                }

                if consumer.next(ordinal, &self.values[symbol]) == Directive::Stop {
                    return Ok(());
                }
                ordinal += 1;
            }
            table = &self.tables[entry.next.0];
        }

        Ok(())
    }

    pub fn root(&self) -> &Table {
        &self.tables[TableId::ROOT.0]
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// Table for an exact prefix, if that context is reachable.
    pub fn table_for(&self, prefix: Prefix) -> Option<&Table> {
        self.by_prefix.get(&prefix).map(|id| &self.tables[id.0])
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Symbol value for an index stored in an [`Entry`].
    pub fn value(&self, index: usize) -> &S {
        &self.values[index]
    }
}

#[derive(Default)]
struct TableBuilder {
    tables: Vec<Table>,
    by_prefix: HashMap<Prefix, TableId>,
    queue: VecDeque<TableId>,
}

impl TableBuilder {
    /// Existing table for `prefix`, or a newly queued empty one.
    fn table_for(&mut self, prefix: Prefix) -> TableId {
        if let Some(&id) = self.by_prefix.get(&prefix) {
            return id;
        }
        let id = TableId(self.tables.len());
        self.tables.push(Table {
            prefix,
            entries: Vec::new(),
        });
        self.by_prefix.insert(prefix, id);
        self.queue.push_back(id);
        id
    }
}

/// Greedily decode whole codes from `prefix ++ byte`.
///
/// Returns the decoded symbol indices and the unconsumed tail of the window.
fn decode_window<S>(tree: &Tree<S>, prefix: Prefix, byte: u8) -> (Vec<usize>, Prefix) {
    let length = prefix.length as usize + 8;
    let window = u64::from(prefix.bits) << 8 | u64::from(byte);

    // Left-align the window so the reader sees its first bit first
    let bytes = (window << (64 - length)).to_be_bytes();
    let mut reader = BitReader::with_bit_len(&bytes, length);

    let mut symbols = Vec::new();
    let mut consumed = 0;
    while let Some(symbol) = tree.decode_index(&mut reader) {
        symbols.push(symbol);
        consumed = reader.position();
    }

    let rest_length = length - consumed;
    let rest_bits = window & ((1u64 << rest_length) - 1);
    (symbols, Prefix::new(rest_bits as u32, rest_length as u8))
}
