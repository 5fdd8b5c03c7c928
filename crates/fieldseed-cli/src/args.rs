use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "fieldseed",
    about = "Synthesize a relational HVAC field-service dataset and grow it over time",
    version,
    after_help = "Examples:\n  fieldseed generate --seed 42                 # 19 tables into ./seeds\n  fieldseed generate --table-rows customers=1000,service_calls=5000\n  fieldseed extend                             # append a batch to ./seeds\n  fieldseed generate --incremental --seed 7    # same as extend\n  fieldseed graph --format dot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a complete dataset, replacing any stored tables
    Generate(GenerateArgs),

    /// Append a batch of new rows to a stored dataset
    Extend(RunArgs),

    /// Print the table dependency graph
    Graph(GraphArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Append to the stored dataset instead of replacing it
    #[arg(long)]
    pub incremental: bool,
}

/// Flags shared by every run that writes tables.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory holding one CSV file per table
    #[arg(long, env = "FIELDSEED_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Date treated as "today" (YYYY-MM-DD)
    #[arg(long)]
    pub base_date: Option<NaiveDate>,

    /// Per-table row count overrides (e.g., customers=1000,leads=50)
    #[arg(long, value_delimiter = ',')]
    pub table_rows: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Output format for the dependency graph
    #[arg(long, default_value = "mermaid")]
    pub format: GraphFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl RunArgs {
    /// Parse table row overrides like "customers=1000,leads=50".
    /// Returns a BTreeMap so the overrides apply in a stable order.
    pub fn parse_table_rows(&self) -> Result<BTreeMap<String, usize>> {
        let mut map = BTreeMap::new();
        for entry in &self.table_rows {
            let Some((table, count_str)) = entry.split_once('=') else {
                bail!("Expected TABLE=ROWS in --table-rows, got '{}'", entry);
            };
            let count = count_str
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid row count in --table-rows entry '{}'", entry))?;
            map.insert(table.trim().to_string(), count);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(table_rows: &[&str]) -> RunArgs {
        RunArgs {
            output_dir: None,
            seed: None,
            base_date: None,
            table_rows: table_rows.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_table_rows() {
        let rows = run_args(&["customers=1000", "leads = 5"])
            .parse_table_rows()
            .unwrap();
        assert_eq!(rows["customers"], 1000);
        assert_eq!(rows["leads"], 5);
    }

    #[test]
    fn test_parse_table_rows_rejects_garbage() {
        assert!(run_args(&["customers"]).parse_table_rows().is_err());
        assert!(run_args(&["customers=many"]).parse_table_rows().is_err());
    }

    #[test]
    fn test_generate_incremental_flag() {
        let cli = Cli::parse_from([
            "fieldseed",
            "generate",
            "--incremental",
            "--seed",
            "7",
            "--base-date",
            "2025-06-15",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert!(args.incremental);
                assert_eq!(args.run.seed, Some(7));
                assert_eq!(args.run.base_date, NaiveDate::from_ymd_opt(2025, 6, 15));
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }
}
