//! Huffman coding of strings, one character at a time.
//!
//! Each string is written as the codes of its characters followed by the
//! [`END_OF_STRING`] code. Characters outside the alphabet are written as the
//! [`ESCAPE`] code followed by the character as a flexible char, so any
//! string without a reserved character can be encoded.
//!
//! ```
//! use symcodec_core::character::{CharacterCodec, DEFAULT_MAX_BITS};
//!
//! let codec = CharacterCodec::train(["hello", "world"], 1, DEFAULT_MAX_BITS).unwrap();
//! let strings = vec!["hello".to_string(), "wörld".to_string()];
//!
//! let encoded = codec.encode_strings(&strings).unwrap();
//! assert_eq!(codec.decode_strings(&encoded, 2).unwrap(), strings);
//! ```

use crate::alphabet::Alphabet;
use crate::bytes::{write_flexible_char, ByteReader};
use crate::codec::Codec;
use crate::error::{AlphabetError, HuffmanError, Result};
use crate::huffman::HuffmanCodec;
use crate::stream::{Collector, Directive, SliceProducer, SymbolConsumer, SymbolProducer};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::io::{BufRead, Write};

/// Terminates every encoded string.
pub const END_OF_STRING: char = '\0';

/// Escape symbol for characters outside the alphabet.
pub const ESCAPE: char = '\u{1}';

pub const DEFAULT_MAX_BITS: u8 = 16;

fn is_reserved(c: char) -> bool {
    c == END_OF_STRING || c == ESCAPE
}

/// Properties key for a character, e.g. `0x61`.
pub fn char_to_key(c: &char) -> String {
    format!("0x{:x}", u32::from(*c))
}

pub fn key_to_char(key: &str) -> Option<char> {
    let hex = key.strip_prefix("0x")?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Codec for strings over a character alphabet.
#[derive(Debug, Clone)]
pub struct CharacterCodec {
    alphabet: Alphabet<char>,
    codec: HuffmanCodec<char>,
}

impl CharacterCodec {
    /// # Errors
    /// `AlphabetError::MissingSymbol` unless the alphabet contains
    /// [`END_OF_STRING`] and has [`ESCAPE`] as its escape symbol.
    pub fn new(alphabet: Alphabet<char>, max_bits: u8) -> Result<Self> {
        if alphabet.position(&END_OF_STRING).is_none() {
            return Err(AlphabetError::MissingSymbol("END_OF_STRING".to_string()).into());
        }
        if alphabet.escape().map(|s| *s.value()) != Some(ESCAPE) {
            return Err(AlphabetError::MissingSymbol("ESCAPE".to_string()).into());
        }
        let codec = HuffmanCodec::new(&alphabet, max_bits)?;
        Ok(Self { alphabet, codec })
    }

    /// Train on sample strings.
    ///
    /// Characters seen fewer than `minimum` times are left to the escape,
    /// whose frequency is the number of occurrences dropped that way.
    pub fn train<I, T>(samples: I, minimum: u64, max_bits: u8) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut counts: BTreeMap<char, u64> = BTreeMap::new();
        let mut strings = 0u64;
        for sample in samples {
            strings += 1;
            for c in sample.as_ref().chars().filter(|&c| !is_reserved(c)) {
                *counts.entry(c).or_insert(0) += 1;
            }
        }

        let dropped: u64 = counts.values().filter(|&&count| count < minimum).sum();
        let mut frequencies: Vec<(char, u64)> = counts
            .into_iter()
            .filter(|&(_, count)| count >= minimum)
            .collect();
        frequencies.push((END_OF_STRING, strings.max(1)));
        frequencies.push((ESCAPE, dropped.max(1)));

        let alphabet = Alphabet::with_escape(frequencies, ESCAPE)?;
        Self::new(alphabet, max_bits)
    }

    /// Load the alphabet from properties text with hex character keys.
    pub fn read_properties<R: BufRead>(reader: R, max_bits: u8) -> Result<Self> {
        let alphabet = Alphabet::read_properties(reader, Some(ESCAPE), key_to_char)?;
        Self::new(alphabet, max_bits)
    }

    pub fn write_properties<W: Write>(&self, writer: W) -> Result<()> {
        self.alphabet.write_properties(writer, char_to_key)
    }

    pub fn encode_strings(&self, strings: &[String]) -> Result<Vec<u8>> {
        self.encode(&mut SliceProducer::new(strings))
    }

    /// Decode exactly `count` strings from the start of `bytes`.
    pub fn decode_strings(&self, bytes: &[u8], count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut collector = Collector::new(count);
        self.decode(&mut ByteReader::new(bytes), &mut collector)?;
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

    /// Bit-at-a-time decoding, equivalent to [`Codec::decode`].
    pub fn decode_slow<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<String> + ?Sized,
    {
        self.codec.decode_slow(input, &mut StringBuilder::new(consumer))
    }

    pub fn alphabet(&self) -> &Alphabet<char> {
        &self.alphabet
    }

    /// The underlying character codec.
    pub fn codec(&self) -> &HuffmanCodec<char> {
        &self.codec
    }
}

impl Codec<String> for CharacterCodec {
    fn can_encode(&self, symbol: &String) -> bool {
        !symbol.chars().any(is_reserved)
    }

    fn encode_into<P>(&self, output: Vec<u8>, producer: &mut P) -> Result<Vec<u8>>
    where
        P: SymbolProducer<String> + ?Sized,
    {
        let mut characters = Characters::new(producer);
        let output = self.codec.encode_into(output, &mut characters)?;
        match characters.reserved {
            Some(ordinal) => Err(HuffmanError::ReservedSymbol { ordinal }.into()),
            None => Ok(output),
        }
    }

    fn decode<C>(&self, input: &mut ByteReader<'_>, consumer: &mut C) -> Result<()>
    where
        C: SymbolConsumer<String> + ?Sized,
    {
        self.codec.decode(input, &mut StringBuilder::new(consumer))
    }
}

impl fmt::Display for CharacterCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.codec, f)
    }
}

/// Flattens produced strings into characters, each string followed by
/// [`END_OF_STRING`].
struct Characters<'a, P: ?Sized> {
    strings: &'a mut P,
    pending: VecDeque<char>,
    next_string: usize,
    /// Ordinal of a string rejected for containing a reserved character
    reserved: Option<usize>,
}

impl<'a, P: ?Sized> Characters<'a, P> {
    fn new(strings: &'a mut P) -> Self {
        Self {
            strings,
            pending: VecDeque::new(),
            next_string: 0,
            reserved: None,
        }
    }
}

impl<P> SymbolProducer<char> for Characters<'_, P>
where
    P: SymbolProducer<String> + ?Sized,
{
    fn get(&mut self, _ordinal: usize) -> Option<char> {
        if self.pending.is_empty() {
            let string = self.strings.get(self.next_string)?;
            if string.chars().any(is_reserved) {
                self.reserved = Some(self.next_string);
                return None;
            }
            self.next_string += 1;
            self.pending.extend(string.chars());
            self.pending.push_back(END_OF_STRING);
        }
        self.pending.pop_front()
    }

    fn on_escape(&mut self, output: &mut Vec<u8>, symbol: &char) -> Result<()> {
        write_flexible_char(output, *symbol);
        Ok(())
    }
}

/// Accumulates decoded characters and hands each finished string on.
struct StringBuilder<'a, C: ?Sized> {
    strings: &'a mut C,
    current: String,
    ordinal: usize,
}

impl<'a, C: ?Sized> StringBuilder<'a, C> {
    fn new(strings: &'a mut C) -> Self {
        Self {
            strings,
            current: String::new(),
            ordinal: 0,
        }
    }
}

impl<C> SymbolConsumer<char> for StringBuilder<'_, C>
where
    C: SymbolConsumer<String> + ?Sized,
{
    fn next(&mut self, _ordinal: usize, symbol: &char) -> Directive {
        if *symbol != END_OF_STRING {
            self.current.push(*symbol);
            return Directive::Continue;
        }
        let string = std::mem::take(&mut self.current);
        let directive = self.strings.next(self.ordinal, &string);
        self.ordinal += 1;
        directive
    }

    fn on_escape(&mut self, input: &mut ByteReader<'_>) -> Result<Directive> {
        self.current.push(input.read_flexible_char()?);
        Ok(Directive::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample_codec() -> CharacterCodec {
        CharacterCodec::train(["the cat", "the hat", "a bat"], 1, DEFAULT_MAX_BITS).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = sample_codec();
        let input = strings(&["the bat", "", "a cat hat"]);
        let encoded = codec.encode_strings(&input).unwrap();
        assert_eq!(codec.decode_strings(&encoded, 3).unwrap(), input);
    }

    #[test]
    fn test_escaped_characters() {
        let codec = sample_codec();
        let input = strings(&["zebra", "naïve 😀", "cat"]);
        let encoded = codec.encode_strings(&input).unwrap();
        assert_eq!(codec.decode_strings(&encoded, 3).unwrap(), input);

        let mut slow = Collector::new(3);
        codec.decode_slow(&mut ByteReader::new(&encoded), &mut slow).unwrap();
        assert_eq!(slow.into_symbols(), input);
    }

    #[test]
    fn test_reserved_characters_rejected() {
        let codec = sample_codec();
        assert!(!codec.can_encode(&"a\0b".to_string()));
        assert!(codec.can_encode(&"anything else ✓".to_string()));

        let result = codec.encode_strings(&strings(&["ok", "bad\u{1}"]));
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::ReservedSymbol { ordinal: 1 }))
        ));
    }

    #[test]
    fn test_minimum_sends_rare_characters_to_escape() {
        let codec = CharacterCodec::train(["aaab", "aac"], 2, DEFAULT_MAX_BITS).unwrap();
        let alphabet = codec.alphabet();
        assert!(alphabet.position(&'a').is_some());
        assert!(alphabet.position(&'b').is_none());
        assert_eq!(alphabet.escape().map(|s| s.frequency()), Some(2));
        assert!(codec.codec().code(&'c').is_none());

        let input = strings(&["abc", "cab"]);
        let encoded = codec.encode_strings(&input).unwrap();
        assert_eq!(codec.decode_strings(&encoded, 2).unwrap(), input);
    }

    #[test]
    fn test_requires_reserved_symbols() {
        let without_end = Alphabet::with_escape([('a', 3), (ESCAPE, 1)], ESCAPE).unwrap();
        assert!(matches!(
            CharacterCodec::new(without_end, 8),
            Err(Error::Alphabet(AlphabetError::MissingSymbol(_)))
        ));

        let without_escape = Alphabet::new([('a', 3), (END_OF_STRING, 1)]).unwrap();
        assert!(matches!(
            CharacterCodec::new(without_escape, 8),
            Err(Error::Alphabet(AlphabetError::MissingSymbol(_)))
        ));
    }

    #[test]
    fn test_properties_round_trip() {
        let codec = sample_codec();
        let mut text = Vec::new();
        codec.write_properties(&mut text).unwrap();

        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("0x74 = 5"));

        let loaded = CharacterCodec::read_properties(text.as_bytes(), DEFAULT_MAX_BITS).unwrap();
        assert_eq!(loaded.alphabet(), codec.alphabet());
        assert_eq!(loaded.codec().code(&'t'), codec.codec().code(&'t'));
    }

    #[test]
    fn test_hex_keys() {
        assert_eq!(char_to_key(&'a'), "0x61");
        assert_eq!(key_to_char("0x1f600"), Some('😀'));
        assert_eq!(key_to_char("61"), None);
        assert_eq!(key_to_char("0xd800"), None);
    }

    #[test]
    fn test_stop_after_first_string() {
        let codec = sample_codec();
        let encoded = codec.encode_strings(&strings(&["cat", "hat"])).unwrap();

        let mut first = None;
        let mut consumer = |_: usize, string: &String| {
            first = Some(string.clone());
            Directive::Stop
        };
        codec.decode(&mut ByteReader::new(&encoded), &mut consumer).unwrap();
        assert_eq!(first.as_deref(), Some("cat"));
    }
}
