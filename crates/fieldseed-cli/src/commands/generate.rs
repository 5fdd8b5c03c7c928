use anyhow::{Context, Result};

use fieldseed_core::lock;
use fieldseed_core::store::write_all;
use fieldseed_core::{assemble_full, CsvTableStore, GenerationMode, TableName, WriteMode};

use super::{print_summary, resolve_run, spinner, table_bar};
use crate::args::RunArgs;

pub fn run(args: &RunArgs) -> Result<()> {
    let resolved = resolve_run(args, GenerationMode::Full)?;
    let plan = &resolved.plan;

    // Phase 1: Generate every table in memory
    let pb = table_bar("1/2", plan.mode.tables().len());
    let progress = |table: TableName, done: usize, _total: usize| {
        pb.set_position(done as u64);
        pb.set_message(table.to_string());
    };
    let data = assemble_full(plan, Some(&progress)).context("Full generation failed")?;
    pb.finish_with_message(format!("✓ {} rows (seed {})", data.total_rows(), plan.seed));

    // Phase 2: Replace the stored tables
    let pb2 = spinner(
        "2/2",
        &format!("Writing to {}...", resolved.output_dir.display()),
    );
    let mut store = CsvTableStore::new(&resolved.output_dir);
    let written = write_all(&mut store, &data, WriteMode::Overwrite)
        .with_context(|| format!("Failed to write tables to {}", resolved.output_dir.display()))?;
    pb2.finish_with_message(format!(
        "Writing to {}... ✓",
        resolved.output_dir.display()
    ));

    print_summary(&data);
    eprintln!(
        "\n✓ Generated {} rows across {} tables → {}",
        written,
        data.tables.len(),
        resolved.output_dir.display()
    );

    lock::record_run(&resolved.output_dir, plan, &data)?;
    eprintln!(
        "Lock file written to {}",
        resolved.output_dir.join(lock::LOCK_FILE_NAME).display()
    );

    Ok(())
}
