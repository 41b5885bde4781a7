//! Implementation of the lazymemo CLI commands.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::Memoized;
use crate::memo::{fibonacci_bounded, fibonacci_sequence, EvalStats};
use crate::sequence::sources::{
    csv_records, file_lines, naturals, paginate, prefixed_ids, range, range_step, Status,
};
use crate::types::config::{Config, DEFAULT_CONFIG_FILE};
use crate::{LazyMemoError, LazyMemoResult};

#[derive(Debug, Serialize)]
struct FibReport {
    n: i64,
    values: Vec<u128>,
    cache_entries: usize,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Serialize)]
struct LineMatch<'a> {
    line: usize,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct MemoLookup {
    input: i64,
    output: i64,
    cached: bool,
}

/// Initializes configuration in the specified directory.
pub fn init(path: Option<PathBuf>) -> LazyMemoResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(DEFAULT_CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        println!("Use 'lazymemo config' to modify.");
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("lazymemo initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Try:");
    println!("  lazymemo fib 30");
    println!("  lazymemo pipeline --take 5");
    println!("  lazymemo menu");

    Ok(())
}

/// Computes F(n), or F(0..=n) with `sequence`.
pub fn fib(n: i64, sequence: bool, config: &Config, json: bool) -> LazyMemoResult<()> {
    let mut evaluator = fibonacci_bounded(config.evaluator.max_input);

    let values = if sequence {
        fibonacci_sequence(&mut evaluator, n)?
    } else {
        vec![evaluator.evaluate(n)?]
    };
    let stats = evaluator.stats();
    tracing::debug!(?stats, "fibonacci evaluated");

    if json {
        let report = FibReport {
            n,
            values,
            cache_entries: stats.entries,
            hits: stats.hits,
            misses: stats.misses,
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    if sequence {
        println!("F(0..={}): {}", n, join(&values));
    } else {
        println!("F({}) = {}", n, values[0]);
    }
    print_eval_stats(&stats);
    Ok(())
}

fn print_eval_stats(stats: &EvalStats) {
    println!(
        "Cache entries: {} (hits: {}, misses: {})",
        stats.entries, stats.hits, stats.misses
    );
}

/// Prints `start..=end` stepping by `step`.
pub fn range_cmd(start: i64, end: i64, step: i64, json: bool) -> LazyMemoResult<()> {
    let values = range_step(start, end, step)?.collect_vec()?;

    if json {
        println!("{}", serde_json::to_string(&values)?);
    } else {
        println!("{}", values.iter().map(i64::to_string).collect::<Vec<_>>().join(" "));
    }
    Ok(())
}

/// First `take` squares of even natural numbers.
pub fn even_squares(take: usize) -> LazyMemoResult<Vec<u64>> {
    let squares = naturals()
        .filter(|n| n % 2 == 0)
        .map(|n| n * n)
        .take(take);
    Ok(squares.collect_vec()?)
}

/// Runs the even-squares pipeline.
pub fn pipeline(take: Option<usize>, config: &Config, json: bool) -> LazyMemoResult<()> {
    let take = take.unwrap_or(config.sequence.default_take);
    let values = even_squares(take)?;

    if json {
        println!("{}", serde_json::to_string(&values)?);
    } else {
        println!("Even numbers squared (first {}): {}", take, join(&values));
    }
    Ok(())
}

/// Streams `file`, optionally keeping only lines that contain `needle`.
pub fn lines(file: &Path, needle: Option<&str>, json: bool) -> LazyMemoResult<()> {
    let needle = needle.map(str::to_owned);
    let matching = file_lines(file)
        .enumerate()
        .filter(move |(_, line)| needle.as_deref().map_or(true, |n| line.contains(n)));

    let mut count = 0;
    for item in &matching {
        let (index, text) = item?;
        count += 1;
        if json {
            let entry = LineMatch {
                line: index + 1,
                text: &text,
            };
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("  Line {}: {}", index + 1, text);
        }
    }

    if !json {
        println!("\nTotal lines: {}", count);
    }
    Ok(())
}

/// Prints the users in `file` whose status matches `status`.
pub fn users(file: &Path, status: Status, json: bool) -> LazyMemoResult<()> {
    let mut count = 0;
    for user in &csv_records(file, status) {
        let user = user?;
        count += 1;
        if json {
            println!("{}", serde_json::to_string(&user)?);
        } else {
            println!("  {}. {} ({}) - Age: {}", count, user.name, user.email, user.age);
        }
    }

    if !json {
        println!("\nTotal users: {}", count);
    }
    Ok(())
}

/// Prints `total` records split into pages.
pub fn pages(total: u64, page_size: Option<u64>, config: &Config, json: bool) -> LazyMemoResult<()> {
    let page_size = page_size.unwrap_or(config.sequence.page_size);

    for page in &paginate(total, page_size)? {
        let page = page?;
        if json {
            println!("{}", serde_json::to_string(&page)?);
        } else {
            println!(
                "  Page {}/{}: {} records (IDs: {})",
                page.number,
                page.total_pages,
                page.records.len(),
                join(&page.ids())
            );
        }
    }
    Ok(())
}

/// Prints `count` random IDs.
pub fn ids(
    prefix: Option<String>,
    count: Option<usize>,
    config: &Config,
    json: bool,
) -> LazyMemoResult<()> {
    let prefix = prefix.unwrap_or_else(|| config.sequence.id_prefix.clone());
    let count = count.unwrap_or(config.sequence.default_take);
    let ids = prefixed_ids(prefix).take(count).collect_vec()?;

    if json {
        println!("{}", serde_json::to_string(&ids)?);
    } else {
        println!("{}", ids.join(", "));
    }
    Ok(())
}

/// Sums `1..=end` without materializing the range.
pub fn lazy_sum(end: i64) -> LazyMemoResult<i128> {
    let mut total = 0i128;
    for value in &range(1, end) {
        total += i128::from(value?);
    }
    Ok(total)
}

/// Prints the sum of `1..=end`.
pub fn sum(end: i64, json: bool) -> LazyMemoResult<()> {
    let total = lazy_sum(end)?;

    if json {
        println!("{}", serde_json::to_string(&total)?);
    } else {
        println!("Sum of 1..={}: {}", end, total);
    }
    Ok(())
}

/// `n * n`, or `Overflow` when it does not fit in `i64`.
pub fn checked_square(n: &i64) -> LazyMemoResult<i64> {
    n.checked_mul(*n)
        .ok_or_else(|| LazyMemoError::Overflow(n.to_string()))
}

/// Squares each input through a bounded memoizer, reporting hits and misses.
pub fn memo(values: &[i64], config: &Config, json: bool) -> LazyMemoResult<()> {
    let mut square = Memoized::fallible(checked_square, config.evaluator.memo_capacity);

    for &input in values {
        let cached = square.contains(&input);
        let output = square.try_call(&input)?;
        if json {
            let lookup = MemoLookup {
                input,
                output,
                cached,
            };
            println!("{}", serde_json::to_string(&lookup)?);
        } else {
            let tag = if cached { "HIT" } else { "MISS" };
            println!("  [{}] {} -> {}", tag, input, output);
        }
    }

    if !json {
        let stats = square.stats();
        println!(
            "\nHit rate: {:.0}% ({} hits, {} misses)",
            stats.hit_rate() * 100.0,
            stats.hits,
            stats.misses
        );
    }
    Ok(())
}

/// Edits the configuration interactively.
pub fn config_cmd(config_path: &Path) -> LazyMemoResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    if config_path.exists() {
        let config = Config::load(config_path)?;
        show_config_summary(&config);
    }

    run_interactive_config(config_path)
}

/// Shows version.
pub fn version() {
    println!("lazymemo {}", env!("CARGO_PKG_VERSION"));
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
