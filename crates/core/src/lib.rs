//! symcodec-core: Length-limited Huffman coding over arbitrary symbol alphabets
//!
//! This library provides:
//! - Code trees whose codes never exceed a caller-chosen bit length
//! - A bit-level codec with an escape mechanism for symbols outside the alphabet
//! - A table-driven decoder that consumes input a byte at a time
//! - String codecs built on top: per-character and whole-string list coding
//!
//! # Architecture
//!
//! - `bitio`: Low-level bit reading/writing
//! - `bytes`: Byte cursor and compact integer encodings
//! - `alphabet`: Symbols, frequencies and properties text
//! - `tree`: Length-limited canonical code trees
//! - `stream`: Symbol producers and consumers
//! - `codec`: The shared `Codec` trait
//! - `huffman`: Encoder plus bit-at-a-time decoder
//! - `fast`: Precomputed byte-at-a-time decoder
//! - `character`: Strings coded one character at a time
//! - `string_list`: Lists mixing whole-string and per-character codes
//! - `metrics`: Observable run behavior
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: The same alphabet always yields the same codes
//! - **Immutable codecs**: Built once, then shareable across threads
//!
//! # Example
//!
//! ```
//! use symcodec_core::{Alphabet, Codec, HuffmanCodec};
//! use symcodec_core::bytes::ByteReader;
//! use symcodec_core::stream::Collector;
//!
//! let alphabet = Alphabet::new([('a', 5), ('b', 2), ('c', 1)]).unwrap();
//! let codec = HuffmanCodec::new(&alphabet, 8).unwrap();
//!
//! let encoded = codec.encode_symbols(&['a', 'a', 'b', 'a', 'c']).unwrap();
//! assert_eq!(encoded, vec![0b0010_0110]);
//!
//! let mut collector = Collector::new(5);
//! codec.decode(&mut ByteReader::new(&encoded), &mut collector).unwrap();
//! assert_eq!(collector.into_symbols(), vec!['a', 'a', 'b', 'a', 'c']);
//! ```

pub mod alphabet;
pub mod bitio;
pub mod bytes;
pub mod character;
pub mod codec;
pub mod error;
pub mod fast;
pub mod huffman;
pub mod metrics;
pub mod stream;
pub mod string_list;
pub mod tree;

// Re-export commonly used types
pub use alphabet::{Alphabet, CodedSymbol, Symbol};
pub use character::CharacterCodec;
pub use codec::Codec;
pub use error::{Error, Result};
pub use fast::FastDecoder;
pub use huffman::HuffmanCodec;
pub use stream::{Directive, SymbolConsumer, SymbolProducer};
pub use string_list::StringListCodec;
pub use tree::{Code, Tree};
