//! `oss-licenses` — build a third-party license manifest from resolved dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and install the `tracing` subscriber.
//! 2. Load the run config ([`config::load_config`]) and the override manifest
//!    ([`license::overrides`]).
//! 3. Load the resolved-artifact list ([`inputs::load_dependencies`]).
//! 4. Initialize the record file and raw-text store ([`report`]); failure here
//!    aborts before any dependency is touched.
//! 5. Process every dependency in order ([`pipeline::Generator`]).
//! 6. Print the run summary ([`report::terminal`]).

mod bundle;
mod cli;
mod config;
mod descriptor;
mod error;
mod extract;
mod inputs;
mod ledger;
mod license;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::load_config;
use inputs::load_dependencies;
use license::overrides::OverrideResolver;
use pipeline::Generator;
use report::records::RecordWriter;
use report::texts::TextStore;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    let family = config.granular_family()?;

    let overrides = match cli.overrides.as_ref().or(config.overrides.as_ref()) {
        Some(path) => OverrideResolver::load(path)?,
        None => OverrideResolver::default(),
    };

    let deps = load_dependencies(&cli.dependencies)?;
    info!(
        "{} dependencies, {} overrides, granular family {} from {}",
        deps.len(),
        overrides.len(),
        family.group,
        family.threshold
    );

    let mut generator = Generator::new(
        family,
        overrides,
        RecordWriter::new(config.records_path()),
        TextStore::new(&config.output.dir, &config.output.texts)?,
    );
    generator.init()?;

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(deps.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for dep in &deps {
        if let Some(pb) = &pb {
            pb.set_message(dep.key());
        }
        generator.process(dep)?;
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let records = generator.records_path().to_path_buf();
    let stats = generator.finish();
    report::terminal::render(&stats, &records, cli.verbose, cli.quiet);

    Ok(())
}
