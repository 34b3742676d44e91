//! Output formatting for detection reports
//!
//! JSON and YAML serialize the same document; the human format is a short
//! tree view meant for terminals.
//!
//! # Example
//!
//! ```no_run
//! use msminer::cli::output::{OutputFormat, OutputFormatter};
//! use msminer::MicroserviceDetector;
//! use std::path::Path;
//!
//! let report = MicroserviceDetector::baseline()
//!     .analyze("acme", "shop", Path::new("/tmp/shop"))
//!     .unwrap();
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format_report(&report, false).unwrap());
//! ```

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::path::Path;

use crate::compose::ManifestCandidate;
use crate::detection::{BuildFile, Container, Microservice, SnapshotReport};
use crate::fs::relative_to;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a snapshot report; leftovers are included only when asked for
    pub fn format_report(&self, report: &SnapshotReport, leftovers: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report_document(report, leftovers))
                .context("Failed to serialize report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&report_document(report, leftovers))
                .context("Failed to serialize report to YAML"),
            OutputFormat::Human => Ok(self.format_report_human(report, leftovers)),
        }
    }

    pub fn format_manifests(&self, root: &Path, candidates: &[ManifestCandidate]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(candidates)
                .context("Failed to serialize manifests to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(candidates).context("Failed to serialize manifests to YAML")
            }
            OutputFormat::Human => Ok(self.format_manifests_human(root, candidates)),
        }
    }

    fn format_report_human(&self, report: &SnapshotReport, leftovers: bool) -> String {
        let mut output = String::new();
        let classification = &report.classification;

        let title = if report.owner.is_empty() {
            report.repo.clone()
        } else {
            format!("{}/{}", report.owner, report.repo)
        };
        let _ = writeln!(output, "\u{2713} Microservices of {}", title);
        let _ = writeln!(output, "{}\n", RULE);

        let manifest = report
            .manifest
            .as_deref()
            .map(|m| display_relative(m, &report.root))
            .unwrap_or_else(|| "(none)".to_string());
        let _ = writeln!(output, "Manifest:    {}", manifest);
        let _ = writeln!(output, "Services:    {}", report.containers.len());
        let _ = writeln!(output, "Identified:  {}\n", classification.count());

        if classification.microservices.is_empty() {
            output.push_str("No microservices identified\n");
        } else {
            output.push_str("Microservices:\n");
            push_tree(&mut output, classification.microservices.iter(), |m: &Microservice| {
                let build = m
                    .build
                    .as_ref()
                    .map(|b| b.relative.as_str())
                    .unwrap_or("(no build file)");
                format!("{:<24} {:<20} {}", m.name, m.confidence.as_str(), build)
            });
        }

        if leftovers {
            output.push('\n');
            let _ = writeln!(
                output,
                "Leftover containers: {}",
                classification.leftover_containers.len()
            );
            push_tree(
                &mut output,
                classification.leftover_containers.iter(),
                |c: &Container| c.to_string(),
            );
            let _ = writeln!(
                output,
                "Leftover build files: {}",
                classification.leftover_build_files.len()
            );
            push_tree(
                &mut output,
                classification.leftover_build_files.iter(),
                |b: &BuildFile| b.relative.clone(),
            );
        }

        output
    }

    fn format_manifests_human(&self, root: &Path, candidates: &[ManifestCandidate]) -> String {
        let mut output = String::new();
        if candidates.is_empty() {
            output.push_str("No orchestration manifest found\n");
            return output;
        }

        output.push_str("Candidate manifests (selected first):\n");
        for (i, candidate) in candidates.iter().enumerate() {
            let marker = if i == 0 { "\u{2192}" } else { " " };
            let _ = writeln!(
                output,
                "{} {:<48} tier {} depth {}",
                marker,
                display_relative(&candidate.path, root),
                candidate.tier,
                candidate.depth
            );
        }
        output
    }
}

fn report_document(report: &SnapshotReport, leftovers: bool) -> Value {
    let classification = &report.classification;
    let mut document = json!({
        "owner": report.owner,
        "repo": report.repo,
        "root": report.root,
        "manifest": report.manifest,
        "count": classification.count(),
        "microservices": classification.microservices,
    });

    if leftovers {
        document["declared"] = json!(report.declared);
        document["leftover_containers"] = json!(classification.leftover_containers);
        document["leftover_build_files"] = json!(classification.leftover_build_files);
        document["consumed_build_files"] = json!(classification.consumed_build_files);
    }

    document
}

fn display_relative(path: &Path, root: &Path) -> String {
    relative_to(path, root).unwrap_or_else(|| path.display().to_string())
}

fn push_tree<'a, T: 'a>(
    output: &mut String,
    items: impl ExactSizeIterator<Item = &'a T>,
    render: impl Fn(&T) -> String,
) {
    let last = items.len().saturating_sub(1);
    for (i, item) in items.enumerate() {
        let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
        let _ = writeln!(output, "{}\u{2500} {}", connector, render(item));
    }
}
