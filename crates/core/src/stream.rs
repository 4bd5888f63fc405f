//! Symbol producers and consumers.
//!
//! Encoders pull symbols from a [`SymbolProducer`] by increasing ordinal until
//! it returns `None`; decoders push symbols to a [`SymbolConsumer`] until the
//! input runs out or the consumer returns [`Directive::Stop`].
//!
//! Both sides also carry an escape hook. When a symbol has no code, the
//! encoder writes the escape code, pads to a byte boundary and lets the
//! producer append the raw value; the decoder hands the consumer a
//! [`ByteReader`] positioned at that raw value. The framing of the raw value
//! is private to each producer/consumer pair.
//!
//! Closures implement both traits. Consumer closures need an explicit
//! `&S` parameter type so they accept any borrow lifetime.

use crate::bytes::ByteReader;
use crate::error::{HuffmanError, Result};

/// Tells a decoder whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Stop,
}

/// Supplies symbols to an encoder.
pub trait SymbolProducer<S> {
    /// Symbol at `ordinal`, or `None` when there are no more.
    fn get(&mut self, ordinal: usize) -> Option<S>;

    /// Append an out-of-band representation of an unencodable symbol.
    ///
    /// `output` is byte-aligned when this is called.
    fn on_escape(&mut self, output: &mut Vec<u8>, symbol: &S) -> Result<()> {
        let _ = (output, symbol);
        Err(HuffmanError::EscapeNotSupported.into())
    }
}

/// Receives decoded symbols.
pub trait SymbolConsumer<S> {
    fn next(&mut self, ordinal: usize, symbol: &S) -> Directive;

    /// Read an escaped value written by the matching producer.
    fn on_escape(&mut self, input: &mut ByteReader<'_>) -> Result<Directive> {
        let _ = input;
        Err(HuffmanError::EscapeNotSupported.into())
    }
}

impl<S, F> SymbolProducer<S> for F
where
    F: FnMut(usize) -> Option<S>,
{
    fn get(&mut self, ordinal: usize) -> Option<S> {
        self(ordinal)
    }
}

impl<S, F> SymbolConsumer<S> for F
where
    F: FnMut(usize, &S) -> Directive,
{
    fn next(&mut self, ordinal: usize, symbol: &S) -> Directive {
        self(ordinal, symbol)
    }
}

/// Produces the symbols of a slice, in order.
#[derive(Debug, Clone)]
pub struct SliceProducer<'a, S> {
    symbols: &'a [S],
}

impl<'a, S> SliceProducer<'a, S> {
    pub fn new(symbols: &'a [S]) -> Self {
        Self { symbols }
    }
}

impl<S: Clone> SymbolProducer<S> for SliceProducer<'_, S> {
    fn get(&mut self, ordinal: usize) -> Option<S> {
        self.symbols.get(ordinal).cloned()
    }
}

/// Collects decoded symbols, stopping once `limit` have arrived.
#[derive(Debug, Clone)]
pub struct Collector<S> {
    symbols: Vec<S>,
    limit: usize,
}

impl<S> Collector<S> {
    pub fn new(limit: usize) -> Self {
        Self {
            symbols: Vec::new(),
            limit,
        }
    }

    pub fn is_full(&self) -> bool {
        self.symbols.len() >= self.limit
    }

    pub fn into_symbols(self) -> Vec<S> {
        self.symbols
    }
}

impl<S: Clone> SymbolConsumer<S> for Collector<S> {
    fn next(&mut self, _ordinal: usize, symbol: &S) -> Directive {
        self.symbols.push(symbol.clone());
        if self.is_full() {
            Directive::Stop
        } else {
            Directive::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_producer() {
        let mut producer = |ordinal: usize| (ordinal < 2).then_some(ordinal * 10);
        assert_eq!(producer.get(1), Some(10));
        assert_eq!(producer.get(2), None);

        let mut output = Vec::new();
        assert!(producer.on_escape(&mut output, &5).is_err());
    }

    #[test]
    fn test_closure_consumer() {
        let mut seen = Vec::new();
        let mut consumer = |ordinal: usize, symbol: &char| {
            seen.push((ordinal, *symbol));
            Directive::Continue
        };
        assert_eq!(consumer.next(0, &'a'), Directive::Continue);
        assert!(consumer.on_escape(&mut ByteReader::new(&[])).is_err());
        assert_eq!(seen, vec![(0, 'a')]);
    }

    #[test]
    fn test_slice_producer() {
        let symbols = ["a", "b"];
        let mut producer = SliceProducer::new(&symbols);
        assert_eq!(producer.get(0), Some("a"));
        assert_eq!(producer.get(1), Some("b"));
        assert_eq!(producer.get(2), None);
    }

    #[test]
    fn test_collector_stops_at_limit() {
        let mut collector = Collector::new(2);
        assert_eq!(collector.next(0, &1), Directive::Continue);
        assert_eq!(collector.next(1, &2), Directive::Stop);
        assert!(collector.is_full());
        assert_eq!(collector.into_symbols(), vec![1, 2]);
    }
}
