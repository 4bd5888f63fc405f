//! Sample text generation for runs without an input file.
//!
//! # Design
//!
//! Generated text has:
//! - A small vocabulary of common words with skewed frequencies, so most
//!   words earn whole-word codes
//! - Random lowercase "words" that appear once or twice, which fall back to
//!   per-character coding
//! - Occasional non-ASCII words, which exercise the escape path
//!
//! This makes the codec behavior visible in metrics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const COMMON: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "is", "it", "that", "was", "for", "on", "are", "with",
    "as", "his", "they", "be", "at", "one", "have", "this", "from", "or", "had", "by", "word",
    "but", "what", "some",
];

const FOREIGN: &[&str] = &[
    "café",
    "naïve",
    "façade",
    "straße",
    "smörgåsbord",
    "日本",
    "žluťoučký",
    "ångström",
];

/// Generate roughly `size_bytes` of whitespace-separated words.
///
/// The result is never longer than `size_bytes` and ends on a whole word.
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(size_bytes);

    loop {
        let word = next_word(&mut rng);
        let needed = word.len() + usize::from(!text.is_empty());
        if text.len() + needed > size_bytes {
            break;
        }
        if !text.is_empty() {
            text.push(if rng.gen_range(0..12) == 0 { '\n' } else { ' ' });
        }
        text.push_str(&word);
    }

    text
}

fn next_word(rng: &mut ChaCha8Rng) -> String {
    match rng.gen_range(0..100) {
        // 85% common words, biased toward the front of the list
        0..=84 => {
            let r: f64 = rng.gen();
            let index = ((r * r) * COMMON.len() as f64) as usize;
            COMMON[index.min(COMMON.len() - 1)].to_string()
        }

        // 12% random lowercase words
        85..=96 => {
            let len = rng.gen_range(2..=9);
            (0..len).map(|_| char::from(rng.gen_range(b'a'..=b'z'))).collect()
        }

        // 3% non-ASCII words
        _ => FOREIGN[rng.gen_range(0..FOREIGN.len())].to_string(),
    }
}
