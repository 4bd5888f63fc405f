//! Configuration for the symcodec application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it generates its own sample
//! text from a seed, and prints the seed so runs are reproducible.

use std::path::PathBuf;
use symcodec_core::character::DEFAULT_MAX_BITS;
use symcodec_core::tree::MAX_CODE_BITS;

/// Complete configuration for a codec run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    /// Input text file (None = generate sample)
    pub input_file: Option<PathBuf>,

    /// Seed for the sample generator
    pub seed: u64,

    /// Size of the generated sample in bytes
    pub sample_bytes: usize,

    // === Codec ===
    /// Longest code length in bits
    pub max_bits: u8,

    /// Words seen fewer times are coded per character
    pub min_occurrences: u64,

    /// Strings per encoded list
    pub list_size: usize,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the trained codes
    pub print_codec: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If --seed is not provided, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut max_bits: Option<u8> = None;
        let mut min_occurrences: Option<u64> = None;
        let mut list_size: Option<usize> = None;
        let mut print_config = false;
        let mut print_codec = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--sample-bytes" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--sample-bytes requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid sample-bytes")?);
                }
                "--max-bits" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--max-bits requires a number".to_string());
                    }
                    max_bits = Some(args[i].parse().map_err(|_| "invalid max-bits")?);
                }
                "--min-occurrences" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--min-occurrences requires a number".to_string());
                    }
                    min_occurrences = Some(args[i].parse().map_err(|_| "invalid min-occurrences")?);
                }
                "--list-size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--list-size requires a number".to_string());
                    }
                    list_size = Some(args[i].parse().map_err(|_| "invalid list-size")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--print-codec" => {
                    print_codec = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        let max_bits = max_bits.unwrap_or(DEFAULT_MAX_BITS);
        if max_bits == 0 || max_bits > MAX_CODE_BITS {
            return Err(format!("--max-bits must be between 1 and {}", MAX_CODE_BITS));
        }

        let list_size = list_size.unwrap_or(32);
        if list_size == 0 || list_size > usize::from(u16::MAX) {
            return Err("--list-size must be between 1 and 65535".to_string());
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            input_file,
            seed,
            sample_bytes: sample_bytes.unwrap_or(64 * 1024),
            max_bits,
            min_occurrences: min_occurrences.unwrap_or(1),
            list_size,
            print_config,
            print_codec,
            print_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input_file {
            Some(path) => println!("Input file: {}", path.display()),
            None => println!(
                "Input file: (generate {} bytes, seed {})",
                self.sample_bytes, self.seed
            ),
        }
        println!();
        println!("=== Codec ===");
        println!("Max code length: {} bits", self.max_bits);
        println!("Min occurrences: {}", self.min_occurrences);
        println!("List size: {} strings", self.list_size);
        println!();
    }
}

fn print_help() {
    println!("symcodec: Length-limited Huffman coding of word lists");
    println!();
    println!("USAGE:");
    println!("    symcodec [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>              Input text file (default: generate sample)");
    println!("    --seed <N>               Random seed for the generated sample");
    println!("    --sample-bytes <N>       Generated sample size (default: 65536)");
    println!();
    println!("    --max-bits <N>           Longest code length, 1-32 (default: 16)");
    println!("    --min-occurrences <N>    Words seen fewer times are coded per character (default: 1)");
    println!("    --list-size <N>          Strings per encoded list (default: 32)");
    println!();
    println!("    --print-config           Print resolved configuration");
    println!("    --print-codec            Print the trained codes");
    println!("    --no-metrics             Don't print metrics summary");
    println!("    --help, -h               Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    symcodec                              # Generated sample, random seed");
    println!("    symcodec --seed 42                    # Deterministic run");
    println!("    symcodec --in words.txt --max-bits 12 # Train on a file with short codes");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&[]).unwrap();
        assert!(config.input_file.is_none());
        assert_eq!(config.max_bits, 16);
        assert_eq!(config.min_occurrences, 1);
        assert_eq!(config.list_size, 32);
        assert!(config.print_metrics);
        assert!(!config.print_codec);
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_args(&args(&[
            "--in",
            "words.txt",
            "--seed",
            "42",
            "--max-bits",
            "12",
            "--min-occurrences",
            "3",
            "--list-size",
            "8",
            "--print-codec",
            "--no-metrics",
        ]))
        .unwrap();

        assert_eq!(config.input_file, Some(PathBuf::from("words.txt")));
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_bits, 12);
        assert_eq!(config.min_occurrences, 3);
        assert_eq!(config.list_size, 8);
        assert!(config.print_codec);
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Config::from_args(&args(&["--seed"])).is_err());
        assert!(Config::from_args(&args(&["--seed", "abc"])).is_err());
        assert!(Config::from_args(&args(&["--max-bits", "0"])).is_err());
        assert!(Config::from_args(&args(&["--max-bits", "33"])).is_err());
        assert!(Config::from_args(&args(&["--list-size", "0"])).is_err());
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
    }
}
