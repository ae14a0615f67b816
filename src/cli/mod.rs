//! Command-line entry points.
//!
//! Each job is its own zero-argument executable (`seed-content`,
//! `index-content`). The binaries only parse `--help`/`--version`, set up
//! tracing and call into this module.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::paths::display_relative;
use crate::config::{self, ResolvedConfig};
use crate::core::{seed_builtin, IndexReport, Indexer};
use crate::domain::ContentKind;

/// seed-content - Write the baseline sample content that is missing
#[derive(Parser, Debug)]
#[command(name = "seed-content")]
#[command(author, version, about, long_about = None)]
pub struct SeedCli {}

/// index-content - Build the content index and module map
#[derive(Parser, Debug)]
#[command(name = "index-content")]
#[command(author, version, about, long_about = None)]
pub struct IndexCli {}

/// Initialize tracing (RUST_LOG overrides the default `info` level)
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Run the seeder for the project containing the current directory
pub async fn run_seed() -> Result<()> {
    let cfg = config::load_config()?;
    let report = seed_builtin(&cfg).await?;

    println!("Seeded {} file(s)", report.written_count());
    for path in &report.written {
        println!("  + {}", display_relative(&cfg.root, path));
    }

    Ok(())
}

/// Run the indexer for the project containing the current directory
pub async fn run_index() -> Result<()> {
    let cfg = config::load_config()?;
    let indexer = Indexer::new(cfg);
    let report = indexer.run().await?;

    print!("{}", render_summary(indexer.config(), &report));
    Ok(())
}

/// Human-readable summary of an index run
pub fn render_summary(cfg: &ResolvedConfig, report: &IndexReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Content index");
    for kind in ContentKind::ALL {
        let counts = report.counts(kind);
        let _ = write!(
            out,
            "  {:<16} discovered {:>3}, indexed {:>3}",
            format!("{}:", kind.label()),
            counts.discovered,
            counts.indexed
        );
        if counts.drafts > 0 || counts.skipped > 0 {
            let _ = write!(out, " ({} draft, {} skipped)", counts.drafts, counts.skipped);
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped:");
        for skipped in &report.skipped {
            let _ = writeln!(out, "  {}: {}", skipped.path, skipped.reason);
        }
    }

    if !report.discovery_failures.is_empty() {
        let _ = writeln!(out, "\nNot scanned:");
        for failure in &report.discovery_failures {
            let _ = writeln!(out, "  {}", failure);
        }
    }

    let _ = writeln!(out, "\nChecklist:");
    for kind in ContentKind::ALL {
        let visible = report.counts(kind).indexed > 0;
        let _ = writeln!(
            out,
            "  [{}] {} visible at {}",
            if visible { "x" } else { " " },
            kind.label(),
            kind.route_prefix()
        );
    }

    if let Some(path) = &report.index_path {
        let _ = writeln!(
            out,
            "\nIndex:   {} ({} record(s))",
            display_relative(&cfg.root, path),
            report.indexed()
        );
    }
    if let Some(path) = &report.modules_path {
        let _ = writeln!(out, "Modules: {}", display_relative(&cfg.root, path));
    }

    out
}
