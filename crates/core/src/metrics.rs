//! Metrics collection and reporting for a codec run.
//!
//! Tracks what went in, what came out and how long the two decoders took:
//! - Compression ratio (encoded bytes / raw UTF-8 bytes)
//! - Escape usage
//! - Fast and slow decode timings
//!
//! # Thread Safety
//!
//! `Metrics` is plain data updated by the caller at each stage. For
//! multi-threaded use, keep per-thread metrics and [`Metrics::merge`] them.

use std::time::{Duration, Instant};

/// Counters and timings for one run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Codec ===
    /// Symbols in the trained alphabets
    pub alphabet_symbols: u64,

    /// Decode tables built by the fast decoder
    pub decode_tables: u64,

    // === Encoding ===
    /// Raw UTF-8 bytes of every encoded string
    pub input_bytes: u64,

    /// Bytes produced by the encoder
    pub encoded_bytes: u64,

    /// Lists encoded
    pub lists_encoded: u64,

    /// Strings encoded
    pub strings_encoded: u64,

    /// Strings that fell back to per-character coding
    pub strings_by_character: u64,

    /// Characters written through the escape
    pub escapes: u64,

    // === Decoding ===
    /// Time spent in table-driven decoding
    pub fast_decode: Duration,

    /// Time spent in bit-at-a-time decoding
    pub slow_decode: Duration,

    /// Lists that did not decode back to their input
    pub mismatches: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            alphabet_symbols: 0,
            decode_tables: 0,
            input_bytes: 0,
            encoded_bytes: 0,
            lists_encoded: 0,
            strings_encoded: 0,
            strings_by_character: 0,
            escapes: 0,
            fast_decode: Duration::ZERO,
            slow_decode: Duration::ZERO,
            mismatches: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Add another run's counters to this one.
    ///
    /// Timing bounds are left alone.
    pub fn merge(&mut self, other: &Metrics) {
        self.input_bytes += other.input_bytes;
        self.encoded_bytes += other.encoded_bytes;
        self.lists_encoded += other.lists_encoded;
        self.strings_encoded += other.strings_encoded;
        self.strings_by_character += other.strings_by_character;
        self.escapes += other.escapes;
        self.fast_decode += other.fast_decode;
        self.slow_decode += other.slow_decode;
        self.mismatches += other.mismatches;
    }

    /// Compute compression ratio (encoded / raw).
    ///
    /// Returns 0.0 if nothing was encoded.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.encoded_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Raw bytes decoded per second by the fast decoder.
    pub fn fast_throughput_bps(&self) -> f64 {
        throughput(self.input_bytes, self.fast_decode)
    }

    /// Raw bytes decoded per second by the slow decoder.
    pub fn slow_throughput_bps(&self) -> f64 {
        throughput(self.input_bytes, self.slow_decode)
    }

    /// How many times faster table decoding was than tree walking.
    pub fn speedup(&self) -> f64 {
        let fast = self.fast_decode.as_secs_f64();
        if fast == 0.0 {
            0.0
        } else {
            self.slow_decode.as_secs_f64() / fast
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Codec ===");
        println!("Alphabet symbols: {}", self.alphabet_symbols);
        println!("Decode tables: {}", self.decode_tables);
        println!();

        println!("=== Compression ===");
        println!("Lists: {}", self.lists_encoded);
        println!(
            "Strings: {} ({} character-coded)",
            self.strings_encoded, self.strings_by_character
        );
        println!("Escapes: {}", self.escapes);
        println!("Raw bytes: {} ({:.2} KiB)", self.input_bytes, self.input_bytes as f64 / 1024.0);
        println!("Encoded: {} ({:.2} KiB)", self.encoded_bytes, self.encoded_bytes as f64 / 1024.0);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Decoding ===");
        println!(
            "Fast: {} us ({:.2} MB/s)",
            self.fast_decode.as_micros(),
            self.fast_throughput_bps() / 1_000_000.0
        );
        println!(
            "Slow: {} us ({:.2} MB/s)",
            self.slow_decode.as_micros(),
            self.slow_throughput_bps() / 1_000_000.0
        );
        println!("Speedup: {:.1}x", self.speedup());
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.mismatches == 0 {
            println!("✓ Round trip completed successfully");
            println!(
                "  {} strings in {} lists, {} -> {} bytes",
                self.strings_encoded, self.lists_encoded, self.input_bytes, self.encoded_bytes
            );
        } else {
            println!("✗ Round trip failed: {} lists did not match", self.mismatches);
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             alphabet_symbols={}\n\
             decode_tables={}\n\
             input_bytes={}\n\
             encoded_bytes={}\n\
             compression_ratio={:.4}\n\
             lists_encoded={}\n\
             strings_encoded={}\n\
             strings_by_character={}\n\
             escapes={}\n\
             fast_decode_us={}\n\
             slow_decode_us={}\n\
             mismatches={}\n",
            self.duration().as_millis(),
            self.alphabet_symbols,
            self.decode_tables,
            self.input_bytes,
            self.encoded_bytes,
            self.compression_ratio(),
            self.lists_encoded,
            self.strings_encoded,
            self.strings_by_character,
            self.escapes,
            self.fast_decode.as_micros(),
            self.slow_decode.as_micros(),
            self.mismatches,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        bytes as f64 / secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100); // Should be recent
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.compression_ratio(), 0.0);

        metrics.input_bytes = 1000;
        metrics.encoded_bytes = 450;
        assert_eq!(metrics.compression_ratio(), 0.45);
    }

    #[test]
    fn test_speedup() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.speedup(), 0.0);

        metrics.fast_decode = Duration::from_millis(10);
        metrics.slow_decode = Duration::from_millis(40);
        assert_eq!(metrics.speedup(), 4.0);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = Metrics::new();
        metrics.input_bytes = 1_000_000;
        metrics.fast_decode = Duration::from_millis(500);

        assert_eq!(metrics.fast_throughput_bps(), 2_000_000.0);
        assert_eq!(metrics.slow_throughput_bps(), 0.0);
    }

    #[test]
    fn test_merge() {
        let mut total = Metrics::new();
        let mut part = Metrics::new();
        part.strings_encoded = 3;
        part.escapes = 2;
        part.fast_decode = Duration::from_micros(5);

        total.merge(&part);
        total.merge(&part);
        assert_eq!(total.strings_encoded, 6);
        assert_eq!(total.escapes, 4);
        assert_eq!(total.fast_decode, Duration::from_micros(10));
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.input_bytes = 1000;
        metrics.encoded_bytes = 500;
        metrics.lists_encoded = 10;

        let text = metrics.export_text();
        assert!(text.contains("input_bytes=1000"));
        assert!(text.contains("encoded_bytes=500"));
        assert!(text.contains("compression_ratio=0.5000"));
        assert!(text.contains("lists_encoded=10"));
    }
}
