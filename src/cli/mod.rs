pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, DetectArgs, ManifestsArgs};
pub use handlers::{handle_detect, handle_manifests};
pub use output::{OutputFormat, OutputFormatter};
