//! Huffman codec over an arbitrary symbol alphabet.
//!
//! # Encoding
//! Each produced symbol is written as its code, MSB first. A symbol without a
//! code is written as the escape code, then the output is padded to a byte
//! boundary and the producer appends the raw value. The last partial byte is
//! zero padded.
//!
//! # Decoding
//! [`Codec::decode`] uses the [`FastDecoder`] tables. [`HuffmanCodec::decode_slow`]
//! walks the code tree one bit at a time and yields the same symbols; it is
//! kept as a reference and for single-symbol reads via
//! [`HuffmanCodec::decode_bits`].
//!
//! Padding bits decode like any other bits, so the framing around an encoded
//! stream must say where it ends: a known count (see
//! [`HuffmanCodec::decode_symbols`]) or a terminating symbol.

use crate::alphabet::{Alphabet, CodedSymbol, Symbol};
use crate::bitio::{BitReader, BitWriter};
use crate::bytes::ByteReader;
use crate::codec::Codec;
use crate::error::{HuffmanError, Result};
use crate::fast::FastDecoder;
use crate::stream::{Collector, Directive, SliceProducer, SymbolConsumer, SymbolProducer};
use crate::tree::{Code, Tree};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// Length-limited Huffman codec for symbols of type `S`.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S> {
    tree: Tree<S>,
    /// Symbol value to index in `tree`
    index: HashMap<S, usize>,
    fast: FastDecoder<S>,
}

impl<S: Symbol> HuffmanCodec<S> {
    /// Build a codec whose codes are at most `max_bits` long.
    ///
    /// Construction is deterministic: the same alphabet and bit budget always
    /// give the same codes.
    pub fn new(alphabet: &Alphabet<S>, max_bits: u8) -> Result<Self> {
        let tree = Tree::build(alphabet, max_bits)?;
        let index = tree
            .symbols()
            .iter()
            .enumerate()
            .map(|(i, symbol)| (symbol.value().clone(), i))
            .collect();
        let fast = FastDecoder::new(&tree);

        debug!(
            "huffman codec ready: {} symbols, longest code {} bits, {} decode tables",
            tree.len(),
            tree.height(),
            fast.table_count()
        );

        Ok(Self { tree, index, fast })
    }

    /// Code assigned to `symbol`, if it is in the alphabet.
    pub fn code(&self, symbol: &S) -> Option<Code> {
        self.index.get(symbol).map(|&i| self.tree.code(i))
    }

    /// Whether `symbol` has a code, looked up through any borrowed form.
    pub fn contains<Q>(&self, symbol: &Q) -> bool
    where
        S: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(symbol)
    }

    /// The escape symbol and its code.
    pub fn escape(&self) -> Option<(&S, Code)> {
        self.tree
            .escape_index()
            .map(|i| (self.tree.symbols()[i].value(), self.tree.code(i)))
    }

    /// Encode a slice of symbols.
    pub fn encode_symbols(&self, symbols: &[S]) -> Result<Vec<u8>> {
        self.encode(&mut SliceProducer::new(symbols))
    }

    /// Decode exactly `count` symbols from the start of `bytes`.
    ///
    /// # Errors
    /// `HuffmanError::LengthMismatch` if the input holds fewer symbols.
    pub fn decode_symbols(&self, bytes: &[u8], count: usize) -> Result<Vec<S>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut collector = Collector::new(count);
        self.decode(&mut ByteReader::new(bytes), &mut collector)?;
        if !collector.is_full() {
            let actual = collector.into_symbols().len();
            return Err(HuffmanError::LengthMismatch {
                expected: count,
                actual,
            }
            .into());
        }
        Ok(collector.into_symbols())
    }
}

impl<S> HuffmanCodec<S> {
    /// Decode a single symbol by walking the code tree.
    ///
    /// Returns `None` when the reader ends inside a code.
    pub fn decode_bits(&self, reader: &mut BitReader<'_>) -> Option<&CodedSymbol<S>> {
        self.tree.decode(reader)
    }

    /// Bit-at-a-time decoding, equivalent to [`Codec::decode`].
    pub fn decode_slow<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<S> + ?Sized,
    {
        let base = input.position();
        let bytes = input.read_slice(input.remaining())?;
        let mut bits = BitReader::new(bytes);
        let mut ordinal = 0;

        while let Some(index) = self.tree.decode_index(&mut bits) {
            if Some(index) == self.tree.escape_index() {
                bits.align_to_byte();
                input.set_position(base + bits.byte_position())?;
                let directive = consumer.on_escape(input)?;
                bits.set_position((input.position() - base) * 8)?;
                if directive == Directive::Stop {
                    return Ok(());
                }
                continue;
            }

            let symbol = self.tree.symbols()[index].value();
            if consumer.next(ordinal, symbol) == Directive::Stop {
                input.set_position(base + bits.byte_position())?;
                return Ok(());
            }
            ordinal += 1;
        }

        Ok(())
    }

    pub fn tree(&self) -> &Tree<S> {
        &self.tree
    }

    pub fn fast_decoder(&self) -> &FastDecoder<S> {
        &self.fast
    }

    /// Length of the longest code.
    pub fn max_code_length(&self) -> u8 {
        self.tree.height()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl<S: Symbol> Codec<S> for HuffmanCodec<S> {
    fn can_encode(&self, symbol: &S) -> bool {
        self.index.contains_key(symbol)
    }

    fn encode_into<P>(&self, output: Vec<u8>, producer: &mut P) -> Result<Vec<u8>>
    where
        P: SymbolProducer<S> + ?Sized,
    {
        let mut writer = BitWriter::with_output(output);
        let mut ordinal = 0;

        while let Some(symbol) = producer.get(ordinal) {
            match self.code(&symbol) {
                Some(code) => code.write(&mut writer)?,
                None => {
                    let (_, escape) = self.escape().ok_or(HuffmanError::Unencodable { ordinal })?;
                    escape.write(&mut writer)?;
                    producer.on_escape(writer.aligned_output(), &symbol)?;
                }
            }
            ordinal += 1;
        }

        Ok(writer.finish())
    }

    fn decode<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<S> + ?Sized,
    {
        self.fast.decode(input, consumer)
    }
}

impl<S: fmt::Display> fmt::Display for HuffmanCodec<S> {
    /// One line per symbol, least frequent first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[HuffmanCodec size = {}, bits = {}]:",
            self.tree.len(),
            self.tree.height()
        )?;

        let symbols = self.tree.symbols();
        let mut order: Vec<usize> = (0..symbols.len()).collect();
        order.sort_by_key(|&i| symbols[i].frequency());

        for (line, &i) in order.iter().enumerate() {
            let value = symbols[i].value().to_string();
            let mut chars = value.chars();
            let shown = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_control() => format!("0x{:02x}", u32::from(c)),
                _ => value,
            };
            write!(
                f,
                "\n    {}. {} -> '{}' ({})",
                line + 1,
                self.tree.code(i),
                shown,
                symbols[i].frequency()
            )?;
        }
        Ok(())
    }
}
