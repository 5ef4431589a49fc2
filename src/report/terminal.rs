use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::pipeline::RunStats;

/// Print the run summary.
pub fn render(stats: &RunStats, records: &Path, verbose: bool, quiet: bool) {
    let gaps = stats.gaps.len();

    if quiet {
        println!(
            "Dependencies: {}  Rows: {}  Duplicates: {}  Gaps: {}",
            stats.dependencies,
            stats.rows.to_string().green(),
            stats.duplicates,
            gap_count(gaps),
        );
        return;
    }

    println!("\n {} v{}", "oss-licenses".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Wrote: {}\n", records.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Dependencies processed : {}", stats.dependencies));
    println!(" │  {:<48} │", format!("Rows written           : {}", stats.rows));
    println!(" │  {:<48} │", format!("Duplicates suppressed  : {}", stats.duplicates));
    println!(" │  {:<48} │", format!("Override substitutions : {}", stats.overrides));
    println!(" │  {:<48} │", format!("Bundled license texts  : {}", stats.texts));
    println!(
        " │  {:<48} │",
        format!("{}  Missing licenses    : {}", status_mark(gaps), gaps)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if gaps > 0 {
        println!(
            " {} Dependencies without license metadata:\n",
            "[WARN]".yellow().bold()
        );
        if verbose {
            render_gaps(stats);
        } else {
            println!(" Re-run with --verbose to list them, or add entries to the override manifest.");
        }
        println!();
    }
}

fn render_gaps(stats: &RunStats) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Url").add_attribute(Attribute::Bold),
        ]);

    for entry in &stats.gaps {
        table.add_row(vec![
            Cell::new(&entry.display_name).fg(Color::Yellow),
            Cell::new(&entry.version),
            Cell::new(&entry.url_or_marker),
        ]);
    }

    println!("{}", table);
}

fn gap_count(gaps: usize) -> ColoredString {
    if gaps == 0 {
        gaps.to_string().green()
    } else {
        gaps.to_string().yellow()
    }
}

fn status_mark(gaps: usize) -> ColoredString {
    if gaps == 0 {
        "✓".green()
    } else {
        "⚠".yellow()
    }
}
