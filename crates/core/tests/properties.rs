//! Property tests over random alphabets and inputs.

use proptest::prelude::*;
use symcodec_core::bytes::ByteReader;
use symcodec_core::stream::Collector;
use symcodec_core::{Alphabet, CharacterCodec, Codec, HuffmanCodec};

/// Frequencies for symbols `0..n`, at least two of them.
fn frequencies() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(1u64..100_000, 2..200)
}

fn alphabet(weights: &[u64]) -> Alphabet<u16> {
    Alphabet::new(
        weights
            .iter()
            .enumerate()
            .map(|(symbol, &weight)| (symbol as u16, weight)),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_round_trip(
        weights in frequencies(),
        max_bits in 8u8..=20,
        picks in proptest::collection::vec(any::<u16>(), 0..2000),
    ) {
        let codec = HuffmanCodec::new(&alphabet(&weights), max_bits).unwrap();
        let symbols: Vec<u16> = picks.iter().map(|pick| pick % weights.len() as u16).collect();

        let encoded = codec.encode_symbols(&symbols).unwrap();
        let decoded = codec.decode_symbols(&encoded, symbols.len()).unwrap();
        prop_assert_eq!(decoded, symbols);
    }

    #[test]
    fn prop_fast_slow_equivalence(
        weights in frequencies(),
        max_bits in 8u8..=16,
        bytes in proptest::collection::vec(any::<u8>(), 0..500),
    ) {
        // Arbitrary bytes are a valid code stream for a complete code
        let codec = HuffmanCodec::new(&alphabet(&weights), max_bits).unwrap();

        let mut fast = Collector::new(usize::MAX);
        codec.decode(&mut ByteReader::new(&bytes), &mut fast).unwrap();
        let mut slow = Collector::new(usize::MAX);
        codec.decode_slow(&mut ByteReader::new(&bytes), &mut slow).unwrap();

        prop_assert_eq!(fast.into_symbols(), slow.into_symbols());
    }

    #[test]
    fn prop_length_bound(weights in frequencies(), max_bits in 8u8..=12) {
        let codec = HuffmanCodec::new(&alphabet(&weights), max_bits).unwrap();
        let codes = codec.tree().codes();

        prop_assert!(codes.iter().all(|code| code.length() >= 1 && code.length() <= max_bits));

        // A full binary tree satisfies Kraft's equality
        let kraft: u64 = codes.iter().map(|code| 1u64 << (max_bits - code.length())).sum();
        prop_assert_eq!(kraft, 1u64 << max_bits);
    }

    #[test]
    fn prop_character_round_trip(
        strings in proptest::collection::vec("[a-f ]{0,12}|\\PC{0,6}", 0..40),
    ) {
        // \PC excludes control characters, so no reserved ones
        let codec = CharacterCodec::train(["abc def", "fed cba"], 1, 12).unwrap();

        let encoded = codec.encode_strings(&strings).unwrap();
        let decoded = codec.decode_strings(&encoded, strings.len()).unwrap();
        prop_assert_eq!(decoded, strings);
    }
}
