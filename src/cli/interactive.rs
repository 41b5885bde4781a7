//! Interactive prompts: the demo menu and the configuration editor.

use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use super::commands;
use crate::types::config::Config;
use crate::LazyMemoResult;

/// Runs the numbered demo menu until the user picks "Exit".
pub fn run_menu(config: &Config) -> LazyMemoResult<()> {
    let theme = ColorfulTheme::default();

    println!("\nlazymemo demos\n");

    loop {
        let options = [
            "Fibonacci (memoized)",
            "Even squares pipeline",
            "Range with step",
            "Paginated records",
            "Random IDs",
            "Lines of a file",
            "Memoized squares",
            "Exit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("Choose a demo")
            .items(&options)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => demo_fibonacci(&theme, config),
            1 => demo_pipeline(&theme, config),
            2 => demo_range(&theme),
            3 => demo_pages(&theme, config),
            4 => demo_ids(&theme, config),
            5 => demo_lines(&theme),
            6 => demo_memo(&theme, config),
            _ => break,
        };

        // A failed demo should not end the session.
        if let Err(err) = outcome {
            println!("\nError: {}\n", err);
        }
        println!();
    }

    Ok(())
}

fn demo_fibonacci(theme: &ColorfulTheme, config: &Config) -> LazyMemoResult<()> {
    let n: i64 = Input::with_theme(theme)
        .with_prompt(format!("n (0-{})", config.evaluator.max_input))
        .default(30)
        .interact_text()?;

    let sequence = Confirm::with_theme(theme)
        .with_prompt("Print the whole sequence?")
        .default(false)
        .interact()?;

    commands::fib(n, sequence, config, false)
}

fn demo_pipeline(theme: &ColorfulTheme, config: &Config) -> LazyMemoResult<()> {
    let take: usize = Input::with_theme(theme)
        .with_prompt("How many values")
        .default(config.sequence.default_take)
        .interact_text()?;

    commands::pipeline(Some(take), config, false)
}

fn demo_range(theme: &ColorfulTheme) -> LazyMemoResult<()> {
    let start: i64 = Input::with_theme(theme)
        .with_prompt("Start")
        .default(0)
        .interact_text()?;
    let end: i64 = Input::with_theme(theme)
        .with_prompt("End (inclusive)")
        .default(10)
        .interact_text()?;
    let step: i64 = Input::with_theme(theme)
        .with_prompt("Step")
        .default(2)
        .interact_text()?;

    commands::range_cmd(start, end, step, false)
}

fn demo_pages(theme: &ColorfulTheme, config: &Config) -> LazyMemoResult<()> {
    let total: u64 = Input::with_theme(theme)
        .with_prompt("Total records")
        .default(25)
        .interact_text()?;

    commands::pages(total, None, config, false)
}

fn demo_ids(theme: &ColorfulTheme, config: &Config) -> LazyMemoResult<()> {
    let prefix: String = Input::with_theme(theme)
        .with_prompt("Prefix")
        .default(config.sequence.id_prefix.clone())
        .interact_text()?;
    let count: usize = Input::with_theme(theme)
        .with_prompt("How many")
        .default(5)
        .interact_text()?;

    commands::ids(Some(prefix), Some(count), config, false)
}

fn demo_lines(theme: &ColorfulTheme) -> LazyMemoResult<()> {
    let file: String = Input::with_theme(theme)
        .with_prompt("File path")
        .interact_text()?;
    let needle: String = Input::with_theme(theme)
        .with_prompt("Only lines containing (empty for all)")
        .allow_empty(true)
        .interact_text()?;

    let needle = Some(needle.as_str()).filter(|n| !n.is_empty());
    commands::lines(&PathBuf::from(file), needle, false)
}

fn demo_memo(theme: &ColorfulTheme, config: &Config) -> LazyMemoResult<()> {
    let raw: String = Input::with_theme(theme)
        .with_prompt("Values separated by spaces")
        .default("5 10 5 10 3".to_string())
        .interact_text()?;

    let values = raw
        .split_whitespace()
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| crate::LazyMemoError::validation(format!("not an integer: {v}")))
        })
        .collect::<LazyMemoResult<Vec<_>>>()?;

    commands::memo(&values, config, false)
}

/// Runs the interactive configuration editor.
pub fn run_interactive_config(config_path: &Path) -> LazyMemoResult<()> {
    let theme = ColorfulTheme::default();

    println!("\nlazymemo configuration\n");

    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Creating a new configuration...\n");
        Config::default_config()
    };

    loop {
        let options = [
            "General",
            "Sequences",
            "Evaluator",
            "Save and exit",
            "Exit without saving",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What do you want to configure?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_sequence(&theme, &mut config)?,
            2 => configure_evaluator(&theme, &mut config)?,
            3 => {
                config.validate()?;
                config.save(config_path)?;
                println!("\nConfiguration saved to: {}\n", config_path.display());
                break;
            }
            4 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Exit without saving?")
                    .default(false)
                    .interact()?
                {
                    println!("\nExiting without saving.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> LazyMemoResult<()> {
    let log_levels = ["error", "warn", "info", "debug", "trace"];
    let current_idx = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let log_level_idx = Select::with_theme(theme)
        .with_prompt("Log level")
        .items(&log_levels)
        .default(current_idx)
        .interact()?;

    config.general.log_level = log_levels[log_level_idx].to_string();

    let log_formats = ["text", "json"];
    let current_format_idx = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let log_format_idx = Select::with_theme(theme)
        .with_prompt("Log format")
        .items(&log_formats)
        .default(current_format_idx)
        .interact()?;

    config.general.log_format = log_formats[log_format_idx].to_string();

    println!("\nGeneral settings updated.\n");
    Ok(())
}

fn configure_sequence(theme: &ColorfulTheme, config: &mut Config) -> LazyMemoResult<()> {
    let take: usize = Input::with_theme(theme)
        .with_prompt("Values taken from infinite sequences")
        .default(config.sequence.default_take)
        .interact_text()?;

    config.sequence.default_take = take;

    let page_size: u64 = Input::with_theme(theme)
        .with_prompt("Records per page")
        .default(config.sequence.page_size)
        .interact_text()?;

    config.sequence.page_size = page_size.max(1);

    let prefix: String = Input::with_theme(theme)
        .with_prompt("ID prefix")
        .default(config.sequence.id_prefix.clone())
        .interact_text()?;

    config.sequence.id_prefix = prefix;

    println!("\nSequence settings updated.\n");
    Ok(())
}

fn configure_evaluator(theme: &ColorfulTheme, config: &mut Config) -> LazyMemoResult<()> {
    let max_input: i64 = Input::with_theme(theme)
        .with_prompt(format!(
            "Largest Fibonacci input (0-{})",
            crate::memo::MAX_FIBONACCI_INPUT
        ))
        .default(config.evaluator.max_input)
        .interact_text()?;

    config.evaluator.max_input = max_input.clamp(0, crate::memo::MAX_FIBONACCI_INPUT);

    let capacity: usize = Input::with_theme(theme)
        .with_prompt("Memoizer capacity (entries)")
        .default(config.evaluator.memo_capacity)
        .interact_text()?;

    config.evaluator.memo_capacity = capacity.max(1);

    println!("\nEvaluator settings updated.\n");
    Ok(())
}

/// Renders the current configuration as a boxed table.
pub fn config_summary(config: &Config) -> String {
    let rows = [
        ("General", None),
        ("Log level", Some(config.general.log_level.clone())),
        ("Log format", Some(config.general.log_format.clone())),
        ("Sequences", None),
        ("Default take", Some(config.sequence.default_take.to_string())),
        ("Page size", Some(config.sequence.page_size.to_string())),
        ("ID prefix", Some(config.sequence.id_prefix.clone())),
        ("Evaluator", None),
        ("Max input", Some(config.evaluator.max_input.to_string())),
        ("Memo capacity", Some(config.evaluator.memo_capacity.to_string())),
    ];

    let mut out = String::from("┌─────────────────────────────────────────┐\n");
    for (i, (label, value)) in rows.iter().enumerate() {
        match value {
            Some(value) => {
                let line = format!("{}: {}", label, value);
                out.push_str(&format!("│ {:<39} │\n", line));
            }
            None => {
                if i > 0 {
                    out.push_str("├─────────────────────────────────────────┤\n");
                }
                out.push_str(&format!("│ {:<39} │\n", label));
                out.push_str("├─────────────────────────────────────────┤\n");
            }
        }
    }
    out.push_str("└─────────────────────────────────────────┘\n");
    out
}

/// Prints the current configuration.
pub fn show_config_summary(config: &Config) {
    println!("\nConfiguration summary\n");
    println!("{}", config_summary(config));
}
