//! The interface shared by every codec in the crate.

use crate::bytes::ByteReader;
use crate::error::Result;
use crate::stream::{SymbolConsumer, SymbolProducer};

/// Encodes a stream of symbols to bytes and decodes them back.
pub trait Codec<S> {
    /// True if `symbol` can be written by [`Codec::encode`].
    fn can_encode(&self, symbol: &S) -> bool;

    /// Append the encoding of every produced symbol to `output`.
    fn encode_into<P>(&self, output: Vec<u8>, producer: &mut P) -> Result<Vec<u8>>
    where
        P: SymbolProducer<S> + ?Sized;

    /// Decode symbols from `input` until it is exhausted or the consumer stops.
    ///
    /// Encoded streams end on a byte boundary, and the zero bits padding the
    /// last byte decode like any other bits: they may yield extra symbols, or
    /// an escape error when the escape code is all zeros. An unbounded decode
    /// must be framed by the caller, with a symbol count
    /// ([`HuffmanCodec::decode_symbols`](crate::HuffmanCodec::decode_symbols)),
    /// a terminator, or a consumer that returns [`Directive::Stop`].
    ///
    /// [`Directive::Stop`]: crate::stream::Directive::Stop
    fn decode<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<S> + ?Sized;

    fn encode<P>(&self, producer: &mut P) -> Result<Vec<u8>>
    where
        P: SymbolProducer<S> + ?Sized,
    {
        self.encode_into(Vec::new(), producer)
    }
}
