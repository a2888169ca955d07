use std::fs;
use std::io::{self, BufRead};

use clap::{Parser, Subcommand};
use ma_dfa::{Builder, StateArena};

/// Command-line front end for building and querying an MA-DFA dictionary.
#[derive(Parser)]
#[command(name = "ma-dfa", version, about)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, ...).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a dictionary from a sorted, newline-delimited word list and
    /// query it.
    Dict {
        /// Path to a file of strictly sorted words, one per line.
        words: String,
        /// Words to query for membership and rank.
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Build a dictionary and emit its Graphviz `dot` representation.
    Dot {
        /// Path to a file of strictly sorted words, one per line.
        words: String,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_sorted_words(path: &str) -> io::Result<Vec<String>> {
    let file = fs::File::open(path)?;
    io::BufReader::new(file).lines().collect()
}

fn build_from_file<'a>(arena: &'a StateArena<'a>, path: &str) -> Builder<'a> {
    let words = read_sorted_words(path).unwrap_or_else(|err| {
        log::error!("failed to read word list {path:?}: {err}");
        std::process::exit(1);
    });
    let mut builder = Builder::new(arena);
    if let Err(err) = builder.add_all(&words) {
        log::error!("failed to build dictionary from {path:?}: {err}");
        std::process::exit(1);
    }
    builder
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Dict { words, queries } => {
            let arena = StateArena::new();
            let mut builder = build_from_file(&arena, &words);
            let dict = builder.build_perfect_hash();
            log::info!("built dictionary with {} accepted words", dict.size());

            for query in queries {
                let rank = dict.number(&query);
                if rank < 0 {
                    println!("{query}: absent");
                } else {
                    println!("{query}: present (rank {rank})");
                }
            }
        }
        Command::Dot { words } => {
            let arena = StateArena::new();
            let mut builder = build_from_file(&arena, &words);
            println!("{}", builder.to_dot());
        }
    }
}
