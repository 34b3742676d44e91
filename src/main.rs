use msminer::cli::commands::{CliArgs, Commands};
use msminer::cli::handlers::{handle_detect, handle_manifests};
use msminer::util::logging::{init_logging, parse_level, LoggingConfig};
use msminer::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("msminer v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args),
        Commands::Manifests(manifests_args) => handle_manifests(manifests_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    config.level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        config.level
    };

    config.include_target = true;

    init_logging(config);
}
