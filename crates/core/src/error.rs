//! Error types for the symbol codec.
//!
//! All operations return structured errors rather than panicking.
//! Construction failures mean no codec is produced at all; there is no
//! partially-built state a caller could observe.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Alphabet: symbol set construction and properties parsing
/// - Huffman: codec construction or encode/decode failures
/// - I/O: reading or writing properties text
#[derive(Debug, Error)]
pub enum Error {
    /// Bit or byte I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Alphabet construction or parsing failed
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    /// Huffman codec error (e.g., too many symbols for the bit budget)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// I/O error while reading or writing properties
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level and byte-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Attempted to read more bits than available
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },

    /// Invalid bit count (e.g., more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Cursor moved outside the readable range
    #[error("position {position} is outside a stream of {len} bits")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Symbol alphabet errors.
#[derive(Debug, Error)]
pub enum AlphabetError {
    /// A binary code tree needs at least two leaves
    #[error("{count} is not enough symbols to create a codec")]
    TooFewSymbols { count: usize },

    /// The designated escape symbol has no frequency entry
    #[error("escape symbol is not part of the alphabet")]
    EscapeNotInAlphabet,

    /// A symbol the codec relies on is absent
    #[error("alphabet is missing required symbol {0}")]
    MissingSymbol(String),

    /// A properties line could not be parsed
    #[error("invalid property on line {line}: {reason}")]
    InvalidProperty { line: usize, reason: String },
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Maximum code length outside the supported range
    #[error("maximum code length {bits} is outside 1..=32")]
    InvalidMaxBits { bits: u8 },

    /// More symbols than distinct codes of the requested length
    #[error("{symbols} symbols cannot be coded in at most {max_bits} bits")]
    AlphabetTooLarge { symbols: usize, max_bits: u8 },

    /// Symbol has no code and the alphabet has no escape symbol
    #[error("symbol at ordinal {ordinal} has no code and no escape symbol is configured")]
    Unencodable { ordinal: usize },

    /// An escape was required but the producer or consumer cannot handle it
    #[error("escape symbol encountered but no escape handler is available")]
    EscapeNotSupported,

    /// Decoded count doesn't match expected count
    #[error("decoded length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Input contains a symbol reserved for framing
    #[error("string at ordinal {ordinal} contains a reserved character")]
    ReservedSymbol { ordinal: usize },

    /// List size does not fit the header
    #[error("list of {size} strings exceeds the maximum of 65535")]
    ListTooLong { size: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
