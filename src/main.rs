mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_diff, run_hash, run_mask, run_match, MatchArgs};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Hash { image, regions } => run_hash(image, regions, args.format, args.output),
        Commands::Mask {
            image,
            regions,
            out,
        } => run_mask(image, regions, out, args.format, args.output),
        Commands::Diff {
            baseline,
            candidate,
            regions,
            diff_out,
            xor,
        } => run_diff(
            args.config,
            args.verbose,
            baseline,
            candidate,
            regions,
            diff_out,
            xor,
            args.format,
            args.output,
        ),
        Commands::Match {
            baseline,
            candidate,
            regions,
            hash,
            browser,
            diff_out,
            always_diff,
        } => run_match(
            args.config,
            args.verbose,
            MatchArgs {
                baseline,
                candidate,
                regions,
                hash,
                browser,
                diff_out,
                always_diff,
            },
            args.format,
            args.output,
        ),
    }
}

/// Log to stderr; RUST_LOG wins, otherwise `--verbose` enables debug events.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "blindcmp_lib=debug,blindcmp=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
