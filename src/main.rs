use std::fs;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use mini_crossword_core::config::GeneratorConfig;
use mini_crossword_core::{generate_with_retry, BlockSetEnumerator, PatternIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// A command line utility to generate mini crossword puzzles
struct Cli {
    /// Path to a newline-delimited, pre-normalized uppercase word list
    dictionary: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new puzzle and print its grid preview and entries
    Generate(Generate),
}

#[derive(Args)]
struct Generate {
    /// RNG seed; equal seeds with an equal dictionary produce equal puzzles
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Wall-clock budget per solve attempt, in seconds
    #[arg(long, default_value_t = 5.0)]
    time_limit_s: f64,
    /// How many attempts to make before giving up
    #[arg(long, default_value_t = 20)]
    max_attempts: u32,
    /// Require this word to appear somewhere in the solved grid
    #[arg(long)]
    forced_word: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let words = match fs::read_to_string(&cli.dictionary) {
        Ok(contents) => contents
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>(),
        Err(e) => {
            error!(path = %cli.dictionary, error = %e, "failed to read dictionary file");
            return ExitCode::FAILURE;
        }
    };

    let config = GeneratorConfig::default();
    let index = match PatternIndex::new(&words, config.min_word_len, config.max_word_len) {
        Ok(index) => index,
        Err(e) => {
            error!(error = %e, "failed to build pattern index");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Generate(args) => {
            let config = GeneratorConfig {
                time_limit_s: args.time_limit_s,
                max_attempts: args.max_attempts,
                forced_word: args.forced_word,
                ..config
            };
            let mut enumerator = BlockSetEnumerator::new();
            let mut rng = StdRng::seed_from_u64(args.seed);

            match generate_with_retry(&index, &mut enumerator, &config, &mut rng) {
                Ok(Some(puzzle)) => {
                    info!(id = %puzzle.id, "puzzle generated");
                    for row in puzzle.grid_preview() {
                        println!("{row}");
                    }
                    println!("id: {}", puzzle.id);
                    println!("across:");
                    for entry in &puzzle.entries.across {
                        println!("  {:>2}. {}", entry.number, entry.answer);
                    }
                    println!("down:");
                    for entry in &puzzle.entries.down {
                        println!("  {:>2}. {}", entry.number, entry.answer);
                    }
                    ExitCode::SUCCESS
                }
                Ok(None) => {
                    error!("no puzzle could be generated within the attempt budget");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(error = %e, "generator error");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
