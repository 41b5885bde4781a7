use clap::Parser;
use lazymemo::cli::{commands, interactive, Cli, Commands};
use lazymemo::types::config::Config;
use lazymemo::LazyMemoResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> LazyMemoResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet); a broken file is an error
    let config = Config::load_or_default(&cli.config)?;

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("lazymemo={}", log_level)
            .parse()
            .unwrap_or_else(|_| "lazymemo=info".parse().expect("fallback directive is valid")),
    );

    if config.general.log_format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    let json = cli.json;
    match cli.command {
        Commands::Init { path } => commands::init(path)?,
        Commands::Fib { n, sequence } => commands::fib(n, sequence, &config, json)?,
        Commands::Range { start, end, step } => commands::range_cmd(start, end, step, json)?,
        Commands::Pipeline { take } => commands::pipeline(take, &config, json)?,
        Commands::Lines { file, contains } => {
            commands::lines(&file, contains.as_deref(), json)?;
        }
        Commands::Users { file, status } => commands::users(&file, status, json)?,
        Commands::Pages { total, page_size } => {
            commands::pages(total, page_size, &config, json)?;
        }
        Commands::Ids { prefix, count } => commands::ids(prefix, count, &config, json)?,
        Commands::Sum { end } => commands::sum(end, json)?,
        Commands::Memo { values } => commands::memo(&values, &config, json)?,
        Commands::Menu => interactive::run_menu(&config)?,
        Commands::Config => commands::config_cmd(&cli.config)?,
        Commands::Version => commands::version(),
    }

    Ok(())
}
