//! symcodec: trains a word-list codec on text and verifies it round trips.
//!
//! The run:
//! 1. Loads the input text (or generates a seeded sample)
//! 2. Trains whole-word and per-character Huffman codecs on its words
//! 3. Encodes the words as lists and decodes them back
//! 4. Decodes the per-character stream with both the table-driven and the
//!    bit-at-a-time decoder and checks they agree
//! 5. Prints metrics

mod config;
mod input_gen;

use config::Config;
use std::process::ExitCode;
use std::time::Instant;
use symcodec_core::bytes::ByteReader;
use symcodec_core::metrics::Metrics;
use symcodec_core::stream::{Collector, Directive};
use symcodec_core::{Codec, Result, StringListCodec};
use tracing::{debug, error, info, warn};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(metrics) => {
            if config.print_metrics {
                metrics.print_summary();
            }
            metrics.print_result();
            if metrics.mismatches == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<Metrics> {
    let mut metrics = Metrics::new();

    let text = match &config.input_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => input_gen::generate_sample_text(config.seed, config.sample_bytes),
    };
    let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    info!("loaded {} words ({} bytes)", words.len(), text.len());

    let codec = StringListCodec::train(&words, config.min_occurrences, config.max_bits)?;
    let characters = codec.characters();
    metrics.alphabet_symbols = characters.codec().len() as u64;
    metrics.decode_tables = characters.codec().fast_decoder().table_count() as u64;
    match codec.strings() {
        Some(strings) => {
            metrics.alphabet_symbols += strings.len() as u64;
            metrics.decode_tables += strings.fast_decoder().table_count() as u64;
            info!(
                "trained {} word codes (longest {} bits)",
                strings.len(),
                strings.max_code_length()
            );
        }
        None => info!(
            "fewer than two words seen {} times, coding every word by character",
            config.min_occurrences
        ),
    }
    info!(
        "trained {} character codes (longest {} bits)",
        characters.codec().len(),
        characters.codec().max_code_length()
    );

    if config.print_codec {
        if let Some(strings) = codec.strings() {
            println!("{}", strings);
        }
        println!("{}", characters);
    }

    // Word lists through the combined codec
    let lists: Vec<Vec<String>> = words
        .chunks(config.list_size)
        .map(<[String]>::to_vec)
        .collect();
    for list in &lists {
        metrics.lists_encoded += 1;
        for word in list {
            metrics.strings_encoded += 1;
            metrics.input_bytes += word.len() as u64;
            if !codec.is_string_coded(word) {
                metrics.strings_by_character += 1;
                metrics.escapes += word
                    .chars()
                    .filter(|c| !characters.codec().can_encode(c))
                    .count() as u64;
            }
        }
    }

    let encoded = codec.encode(&mut |ordinal: usize| lists.get(ordinal).cloned())?;
    metrics.encoded_bytes = encoded.len() as u64;
    debug!("encoded {} lists into {} bytes", lists.len(), encoded.len());

    let mut decoded = 0;
    let mut consumer = |ordinal: usize, list: &Vec<String>| {
        if lists.get(ordinal) != Some(list) {
            warn!("list {} did not round trip", ordinal);
            metrics.mismatches += 1;
        }
        decoded += 1;
        Directive::Continue
    };
    codec.decode(&mut ByteReader::new(&encoded), &mut consumer)?;
    if decoded != lists.len() {
        warn!("decoded {} of {} lists", decoded, lists.len());
        metrics.mismatches += (lists.len() - decoded) as u64;
    }

    // Every word through the character codec, both decoders
    let stream = characters.encode_strings(&words)?;

    let started = Instant::now();
    let mut fast = Collector::new(words.len());
    characters.decode(&mut ByteReader::new(&stream), &mut fast)?;
    metrics.fast_decode = started.elapsed();

    let started = Instant::now();
    let mut slow = Collector::new(words.len());
    characters.decode_slow(&mut ByteReader::new(&stream), &mut slow)?;
    metrics.slow_decode = started.elapsed();

    let fast = fast.into_symbols();
    let slow = slow.into_symbols();
    if fast != slow || fast != words {
        warn!(
            "character decoders disagree ({} fast, {} slow strings)",
            fast.len(),
            slow.len()
        );
        metrics.mismatches += 1;
    }

    metrics.complete();
    Ok(metrics)
}
