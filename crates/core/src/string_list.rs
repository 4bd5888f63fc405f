//! Compression of string lists with whole-string and per-character codes.
//!
//! Strings found in the string alphabet are coded as single symbols; the rest
//! fall back to a [`CharacterCodec`]. Each list is self-delimiting, so lists
//! can be concatenated in one buffer.
//!
//! # Wire Format
//!
//! ```text
//! +----------------+------------------+------------------+-----------------+
//! | size           | string-coded     | string section   | char section    |
//! | flexible short | ceil(size/8) B   | Huffman, padded  | Huffman, padded |
//! +----------------+------------------+------------------+-----------------+
//! ```
//!
//! An empty list is just the zero size byte. A section with no strings takes
//! no bytes. A codec trained on fewer than two common strings has no string
//! alphabet, and every string goes to the character section.

use crate::alphabet::Alphabet;
use crate::bytes::{write_booleans, write_flexible_short, ByteReader};
use crate::character::CharacterCodec;
use crate::codec::Codec;
use crate::error::{HuffmanError, Result};
use crate::huffman::HuffmanCodec;
use crate::stream::{Collector, Directive, SymbolConsumer, SymbolProducer};
use tracing::{debug, trace};

/// Codec for lists of up to 65535 strings.
#[derive(Debug, Clone)]
pub struct StringListCodec {
    strings: Option<HuffmanCodec<String>>,
    characters: CharacterCodec,
}

impl StringListCodec {
    /// Combine a whole-string codec with a character codec.
    ///
    /// With `strings` set to `None` every string is character-coded.
    pub fn new(strings: Option<HuffmanCodec<String>>, characters: CharacterCodec) -> Self {
        Self {
            strings,
            characters,
        }
    }

    /// Train both codecs on sample strings.
    ///
    /// Strings seen at least `minimum` times get whole-string codes, and
    /// characters seen at least `minimum` times get character codes. If
    /// fewer than two strings qualify, no whole-string codec is built.
    pub fn train(samples: &[String], minimum: u64, max_bits: u8) -> Result<Self> {
        let frequencies = Alphabet::frequencies(samples.iter().cloned());
        let alphabet = Alphabet::with_minimum(frequencies, None, minimum)?;
        let strings = if alphabet.len() < 2 {
            debug!(
                "{} strings seen at least {} times, coding all strings by character",
                alphabet.len(),
                minimum
            );
            None
        } else {
            Some(HuffmanCodec::new(&alphabet, max_bits)?)
        };
        let characters = CharacterCodec::train(samples, minimum, max_bits)?;
        Ok(Self::new(strings, characters))
    }

    /// Whether `string` has a whole-string code.
    pub fn is_string_coded(&self, string: &str) -> bool {
        self.strings
            .as_ref()
            .is_some_and(|strings| strings.contains(string))
    }

    /// Encode one list.
    pub fn encode_list(&self, list: &[String]) -> Result<Vec<u8>> {
        self.append_list(Vec::new(), list)
    }

    fn append_list(&self, mut output: Vec<u8>, list: &[String]) -> Result<Vec<u8>> {
        let size = u16::try_from(list.len())
            .map_err(|_| HuffmanError::ListTooLong { size: list.len() })?;
        write_flexible_short(&mut output, size);
        if list.is_empty() {
            return Ok(output);
        }

        let coded: Vec<bool> = list
            .iter()
            .map(|string| self.is_string_coded(string))
            .collect();
        write_booleans(&mut output, &coded);

        let mut whole = Vec::new();
        let mut by_character = Vec::new();
        for (string, &coded) in list.iter().zip(&coded) {
            if coded {
                whole.push(string);
            } else {
                by_character.push(string);
            }
        }
        trace!(
            "encoding list of {}: {} string-coded, {} character-coded",
            list.len(),
            whole.len(),
            by_character.len()
        );

        let output = match &self.strings {
            Some(strings) => strings.encode_into(output, &mut RefProducer(&whole))?,
            None => output,
        };
        self.characters.encode_into(output, &mut RefProducer(&by_character))
    }

    /// Decode one list, leaving `input` at the first byte after it.
    ///
    /// # Errors
    /// `HuffmanError::LengthMismatch` if a section holds fewer strings than
    /// the header announces.
    pub fn decode_list(&self, input: &mut ByteReader<'_>) -> Result<Vec<String>> {
        let size = usize::from(input.read_flexible_short()?);
        if size == 0 {
            return Ok(Vec::new());
        }

        let coded = input.read_booleans(size)?;
        let whole_count = coded.iter().filter(|&&coded| coded).count();

        let whole = match &self.strings {
            Some(strings) => Self::decode_section(strings, input, whole_count)?,
            None if whole_count == 0 => Vec::new(),
            None => {
                return Err(HuffmanError::LengthMismatch {
                    expected: whole_count,
                    actual: 0,
                }
                .into())
            }
        };
        let by_character = Self::decode_section(&self.characters, input, size - whole_count)?;

        let mut whole = whole.into_iter();
        let mut by_character = by_character.into_iter();
        let list: Option<Vec<String>> = coded
            .iter()
            .map(|&coded| if coded { whole.next() } else { by_character.next() })
            .collect();
        list.ok_or_else(|| {
            HuffmanError::LengthMismatch {
                expected: size,
                actual: 0,
            }
            .into()
        })
    }

    fn decode_section<C: Codec<String>>(
        codec: &C,
        input: &mut ByteReader<'_>,
        count: usize,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut collector = Collector::new(count);
        codec.decode(input, &mut collector)?;
        let strings = collector.into_symbols();
        if strings.len() < count {
            return Err(HuffmanError::LengthMismatch {
                expected: count,
                actual: strings.len(),
            }
            .into());
        }
        Ok(strings)
    }

    /// The whole-string codec, if one was trained.
    pub fn strings(&self) -> Option<&HuffmanCodec<String>> {
        self.strings.as_ref()
    }

    pub fn characters(&self) -> &CharacterCodec {
        &self.characters
    }
}

impl Codec<Vec<String>> for StringListCodec {
    fn can_encode(&self, list: &Vec<String>) -> bool {
        list.len() <= usize::from(u16::MAX)
            && list
                .iter()
                .all(|string| self.is_string_coded(string) || self.characters.can_encode(string))
    }

    fn encode_into<P>(&self, mut output: Vec<u8>, producer: &mut P) -> Result<Vec<u8>>
    where
        P: SymbolProducer<Vec<String>> + ?Sized,
    {
        let mut ordinal = 0;
        while let Some(list) = producer.get(ordinal) {
            output = self.append_list(output, &list)?;
            ordinal += 1;
        }
        Ok(output)
    }

    fn decode<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<Vec<String>> + ?Sized,
    {
        let mut ordinal = 0;
        while !input.is_empty() {
            let list = self.decode_list(input)?;
            if consumer.next(ordinal, &list) == Directive::Stop {
                break;
            }
            ordinal += 1;
        }
        Ok(())
    }
}

/// Produces clones of borrowed strings.
struct RefProducer<'a>(&'a [&'a String]);

impl SymbolProducer<String> for RefProducer<'_> {
    fn get(&mut self, ordinal: usize) -> Option<String> {
        self.0.get(ordinal).map(|string| (*string).clone())
    }
}
