use crate::config::parse_confidence;
use crate::detection::Confidence;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Identifies the microservices of container-orchestrated repositories
#[derive(Parser, Debug)]
#[command(
    name = "msminer",
    about = "Identify microservices declared by a repository's orchestration manifest",
    version,
    author,
    long_about = "msminer selects the canonical docker-compose manifest of a checked-out \
                  repository, collects its services and matches them against the repository's \
                  own build definitions. A service is a microservice when it is built from \
                  code in the repository."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Identify the microservices of a repository snapshot",
        long_about = "Runs the whole identification pipeline over a checked-out snapshot.\n\n\
                      Examples:\n  \
                      msminer detect\n  \
                      msminer detect /path/to/repo --owner acme\n  \
                      msminer detect --format json --leftovers"
    )]
    Detect(DetectArgs),

    #[command(
        about = "List candidate manifests in selection order",
        long_about = "Prints every recognized orchestration manifest of a snapshot, most \
                      canonical first.\n\n\
                      Examples:\n  \
                      msminer manifests /path/to/repo"
    )]
    Manifests(ManifestsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the snapshot (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(long, value_name = "OWNER", default_value = "", help = "Repository owner")]
    pub owner: String,

    #[arg(
        long,
        value_name = "NAME",
        help = "Repository name (defaults to the snapshot directory name)"
    )]
    pub repo: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "TIER",
        value_parser = parse_tier,
        help = "Weakest confidence tier to attempt (verified, unverified, image, name)"
    )]
    pub min_confidence: Option<Confidence>,

    #[arg(long, help = "Report explicit builds whose build file is missing")]
    pub accept_unverified: bool,

    #[arg(long, help = "Only match build files that copy user code")]
    pub require_code_copy: bool,

    #[arg(long, help = "Include leftover containers and build files in the output")]
    pub leftovers: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ManifestsArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the snapshot (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_tier(s: &str) -> Result<Confidence, String> {
    parse_confidence(s).map_err(|e| e.to_string())
}
