//! Command-line interface for lazymemo.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::sequence::sources::Status;
use crate::types::config::DEFAULT_CONFIG_FILE;

/// lazymemo - lazy sequence pipelines and memoized recursion.
#[derive(Parser, Debug)]
#[command(name = "lazymemo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default configuration file.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Computes Fibonacci numbers with a memoized evaluator.
    #[command(allow_negative_numbers = true)]
    Fib {
        /// Index to compute.
        n: i64,

        /// Print F(0) through F(n) instead of F(n) alone.
        #[arg(short, long)]
        sequence: bool,
    },

    /// Prints an inclusive range with a custom step.
    #[command(allow_negative_numbers = true)]
    Range {
        /// First value.
        start: i64,

        /// Last value (inclusive).
        end: i64,

        /// Step; negative counts down.
        #[arg(short, long, default_value_t = 1)]
        step: i64,
    },

    /// Squares of even natural numbers, taken from an infinite sequence.
    Pipeline {
        /// Number of values to take.
        #[arg(short, long)]
        take: Option<usize>,
    },

    /// Streams a file line by line.
    Lines {
        /// File to read.
        file: PathBuf,

        /// Only show lines containing this text.
        #[arg(short = 'm', long)]
        contains: Option<String>,
    },

    /// Lists users with a given status from a CSV file.
    Users {
        /// CSV file with a `name,email,age[,status]` header.
        file: PathBuf,

        /// Status to keep.
        #[arg(short, long, value_enum, default_value_t = Status::Active)]
        status: Status,
    },

    /// Splits records into pages.
    Pages {
        /// Total number of records.
        total: u64,

        /// Records per page.
        #[arg(short, long)]
        page_size: Option<u64>,
    },

    /// Generates prefixed random IDs.
    Ids {
        /// ID prefix.
        #[arg(short, long)]
        prefix: Option<String>,

        /// Number of IDs.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Sums 1..=end through a lazy range.
    Sum {
        /// Upper bound.
        end: i64,
    },

    /// Squares values through a bounded memoizer, showing cache hits.
    #[command(allow_negative_numbers = true)]
    Memo {
        /// Inputs, repeated values hit the cache.
        #[arg(required = true)]
        values: Vec<i64>,
    },

    /// Interactive demo menu.
    Menu,

    /// Edits the configuration interactively.
    Config,

    /// Shows version.
    Version,
}
