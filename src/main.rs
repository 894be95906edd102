//! stocatima CLI entry point.

use stocatima::cli::Cli;
use stocatima::error::Error;
use stocatima::migrate;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => return report(&e),
    };

    // Set up tracing based on verbosity
    init_tracing(cli.verbose);

    let config = cli.config();
    match migrate::run(&config) {
        Ok(stats) => {
            println!(
                "Done! Exported {} of {} cards to {}",
                stats.exported,
                stats.cards,
                config.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

fn report(e: &Error) -> ExitCode {
    tracing::debug!(code = e.error_code().as_str(), "migration aborted");
    if let Some(hint) = e.hint() {
        eprintln!("Error: {e}\n  Hint: {hint}");
    } else {
        eprintln!("Error: {e}");
    }
    ExitCode::from(e.exit_code())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
