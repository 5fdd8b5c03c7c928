pub mod extend;
pub mod generate;
pub mod graph;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table as ComfyTable};
use indicatif::{ProgressBar, ProgressStyle};

use fieldseed_core::config::{self, FieldSeedConfig};
use fieldseed_core::{GeneratedData, GenerationMode, GenerationPlan};

use crate::args::RunArgs;

/// Output directory used when neither a flag, env var nor config names one.
const DEFAULT_OUTPUT_DIR: &str = "seeds";

/// A fully resolved run: where to write and what to generate.
pub struct ResolvedRun {
    pub output_dir: PathBuf,
    pub plan: GenerationPlan,
}

/// Merge CLI flags, environment and fieldseed.toml into a plan.
///
/// Precedence: CLI flag (or env var) first, then fieldseed.toml, then
/// built-in defaults. Row counts start from the mode's defaults, then the
/// config section, then `--table-rows` on top.
pub fn resolve_run(args: &RunArgs, mode: GenerationMode) -> Result<ResolvedRun> {
    let config = config::read_config(Path::new("."))?;
    resolve_with_config(args, mode, config.as_ref())
}

fn resolve_with_config(
    args: &RunArgs,
    mode: GenerationMode,
    config: Option<&FieldSeedConfig>,
) -> Result<ResolvedRun> {
    let settings = config.map(|c| &c.generate);

    let seed = args
        .seed
        .or_else(|| settings.and_then(|s| s.seed))
        .unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        });

    let base_date: NaiveDate = args
        .base_date
        .or_else(|| settings.and_then(|s| s.base_date))
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| settings.and_then(|s| s.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut counts = mode.default_counts();
    if let Some(cfg) = config {
        counts
            .apply_overrides(mode, cfg.table_rows(mode))
            .context("Invalid row counts in fieldseed.toml")?;
    }
    counts
        .apply_overrides(mode, &args.parse_table_rows()?)
        .context("Invalid --table-rows")?;

    tracing::debug!(
        "Resolved {} run: seed {}, base date {}, output {}",
        mode,
        seed,
        base_date,
        output_dir.display()
    );

    Ok(ResolvedRun {
        output_dir,
        plan: GenerationPlan::new(mode, seed, base_date).with_counts(counts),
    })
}

/// A step spinner in the `[n/total] message` style.
pub fn spinner(prefix: &str, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{prefix}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// A bar advanced once per generated table.
pub fn table_bar(prefix: &str, tables: usize) -> ProgressBar {
    let pb = ProgressBar::new(tables as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{prefix}] Generating {bar:30.cyan/dim} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_prefix(prefix.to_string());
    pb
}

/// Per-table summary of a run, with the key range each table received.
pub fn print_summary(data: &GeneratedData) {
    let mut t = ComfyTable::new();
    t.set_header(vec!["Table", "Rows", "Keys"]);

    for (name, table) in &data.tables {
        let keys = match table.keys() {
            Ok(keys) => match (keys.first(), keys.last()) {
                (Some(first), Some(last)) => format!("{}..={}", first, last),
                _ => "-".to_string(),
            },
            Err(_) => "-".to_string(),
        };
        t.add_row(vec![
            Cell::new(name.as_str()),
            Cell::new(table.len()),
            Cell::new(keys),
        ]);
    }

    eprintln!("{}", t);
}
