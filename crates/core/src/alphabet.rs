//! Symbol alphabets: the fixed frequency table a codec is trained on.
//!
//! An [`Alphabet`] is an immutable set of [`CodedSymbol`]s plus an optional
//! escape symbol. Symbols are kept sorted by value so two alphabets built
//! from the same frequencies are identical no matter what order the
//! frequencies arrived in, which keeps tree construction deterministic.
//!
//! # Properties Text
//!
//! Alphabets can be saved and reloaded as simple properties text, one symbol
//! per line, most frequent first:
//!
//! ```text
//! # comment
//! the = 12,034
//! of = 7003
//! ```
//!
//! Keys are produced and parsed by caller-supplied converters, since symbols
//! such as `' '` have no natural single-token text form.

use crate::error::{AlphabetError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::io::{BufRead, Write};

/// Bounds every symbol type must satisfy.
///
/// Equality and hashing drive encoder lookups; ordering makes tie-breaks in
/// tree construction deterministic.
pub trait Symbol: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Symbol for T {}

/// A symbol value and the number of times it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodedSymbol<S> {
    value: S,
    frequency: u64,
}

impl<S> CodedSymbol<S> {
    pub fn new(value: S, frequency: u64) -> Self {
        Self { value, frequency }
    }

    pub fn value(&self) -> &S {
        &self.value
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }
}

/// A set of symbols with frequencies, optionally including an escape symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet<S> {
    /// Symbols sorted by value
    symbols: Vec<CodedSymbol<S>>,
    /// Index of the escape symbol in `symbols`
    escape: Option<usize>,
}

impl<S: Symbol> Alphabet<S> {
    /// Alphabet with no escape symbol.
    ///
    /// Repeated symbols have their frequencies summed.
    pub fn new(frequencies: impl IntoIterator<Item = (S, u64)>) -> Result<Self> {
        Self::with_minimum(frequencies, None, 0)
    }

    /// Alphabet whose `escape` symbol signals out-of-band values.
    ///
    /// # Errors
    /// `AlphabetError::EscapeNotInAlphabet` if `escape` has no frequency entry.
    pub fn with_escape(frequencies: impl IntoIterator<Item = (S, u64)>, escape: S) -> Result<Self> {
        Self::with_minimum(frequencies, Some(escape), 0)
    }

    /// Alphabet containing only symbols seen at least `minimum` times.
    ///
    /// The escape symbol is always kept, whatever its frequency.
    pub fn with_minimum(
        frequencies: impl IntoIterator<Item = (S, u64)>,
        escape: Option<S>,
        minimum: u64,
    ) -> Result<Self> {
        let mut counts: BTreeMap<S, u64> = BTreeMap::new();
        for (symbol, frequency) in frequencies {
            *counts.entry(symbol).or_insert(0) += frequency;
        }

        if let Some(escape) = &escape {
            if !counts.contains_key(escape) {
                return Err(AlphabetError::EscapeNotInAlphabet.into());
            }
        }

        let symbols: Vec<_> = counts
            .into_iter()
            .filter(|(symbol, frequency)| *frequency >= minimum || Some(symbol) == escape.as_ref())
            .map(|(symbol, frequency)| CodedSymbol::new(symbol, frequency))
            .collect();

        let escape = escape.and_then(|escape| symbols.iter().position(|s| s.value == escape));

        Ok(Self { symbols, escape })
    }

    /// Count occurrences of each symbol in a sample stream.
    pub fn frequencies(samples: impl IntoIterator<Item = S>) -> BTreeMap<S, u64> {
        let mut counts = BTreeMap::new();
        for sample in samples {
            *counts.entry(sample).or_insert(0) += 1;
        }
        counts
    }

    /// Load an alphabet from properties text.
    ///
    /// # Errors
    /// `AlphabetError::InvalidProperty` for lines without `=`, keys the
    /// converter rejects, or frequencies that are not integers.
    pub fn read_properties<R: BufRead>(
        reader: R,
        escape: Option<S>,
        from_key: impl Fn(&str) -> Option<S>,
    ) -> Result<Self> {
        let mut frequencies = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let invalid = |reason: &str| AlphabetError::InvalidProperty {
                line: line_number,
                reason: reason.to_string(),
            };

            let (key, value) = trimmed.split_once('=').ok_or_else(|| invalid("missing '='"))?;
            let symbol = from_key(key.trim()).ok_or_else(|| invalid("unrecognized symbol key"))?;
            let frequency = value
                .trim()
                .replace(',', "")
                .parse::<u64>()
                .map_err(|_| invalid("frequency is not an integer"))?;

            frequencies.push((symbol, frequency));
        }
        Self::with_minimum(frequencies, escape, 0)
    }

    /// Save this alphabet as properties text, most frequent symbol first.
    pub fn write_properties<W: Write>(
        &self,
        mut writer: W,
        to_key: impl Fn(&S) -> String,
    ) -> Result<()> {
        for (line, symbol) in self.sorted_by_frequency().into_iter().rev().enumerate() {
            let key = to_key(symbol.value());
            if key.contains('=') || key.trim() != key || key.is_empty() {
                return Err(AlphabetError::InvalidProperty {
                    line: line + 1,
                    reason: format!("key {key:?} cannot be written"),
                }
                .into());
            }
            writeln!(writer, "{} = {}", key, symbol.frequency())?;
        }
        Ok(())
    }

    /// Symbols ordered by ascending frequency, ties in symbol order.
    pub fn sorted_by_frequency(&self) -> Vec<&CodedSymbol<S>> {
        let mut sorted: Vec<_> = self.symbols.iter().collect();
        sorted.sort_by_key(|symbol| symbol.frequency);
        sorted
    }

    /// Position of a symbol value in [`Alphabet::symbols`].
    pub fn position(&self, value: &S) -> Option<usize> {
        self.symbols.binary_search_by(|s| s.value.cmp(value)).ok()
    }
}

impl<S> Alphabet<S> {
    /// All symbols, sorted by value.
    pub fn symbols(&self) -> &[CodedSymbol<S>] {
        &self.symbols
    }

    pub fn escape(&self) -> Option<&CodedSymbol<S>> {
        self.escape.map(|index| &self.symbols[index])
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
}

impl<S: fmt::Debug> fmt::Display for Alphabet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Alphabet escape = {:?}, size = {}]",
            self.escape().map(CodedSymbol::value),
            self.len()
        )?;
        for symbol in &self.symbols {
            write!(f, "\n    {:?} ({})", symbol.value, symbol.frequency)?;
        }
        Ok(())
    }
}
