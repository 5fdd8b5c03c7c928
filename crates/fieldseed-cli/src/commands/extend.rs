use anyhow::{Context, Result};

use fieldseed_core::lock;
use fieldseed_core::store::write_all;
use fieldseed_core::{
    extend_dataset, CsvTableStore, FieldSeedError, GenerationMode, TableName, WriteMode,
};

use super::{print_summary, resolve_run, spinner, table_bar};
use crate::args::RunArgs;

pub fn run(args: &RunArgs) -> Result<()> {
    let resolved = resolve_run(args, GenerationMode::Incremental)?;
    let plan = &resolved.plan;
    let mut store = CsvTableStore::new(&resolved.output_dir);

    // Phase 1: Read stored keys and generate the increment
    let pb = table_bar("1/2", plan.mode.tables().len());
    let progress = |table: TableName, done: usize, _total: usize| {
        pb.set_position(done as u64);
        pb.set_message(table.to_string());
    };
    let data = match extend_dataset(&store, plan, Some(&progress)) {
        Ok(data) => data,
        Err(FieldSeedError::NoExistingData { table }) => {
            pb.abandon();
            tracing::debug!(
                "{} has no {} table",
                resolved.output_dir.display(),
                table
            );
            eprintln!("No existing data found. Run full generation first.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Incremental generation failed"),
    };
    pb.finish_with_message(format!("✓ {} new rows (seed {})", data.total_rows(), plan.seed));

    // Phase 2: Append to the stored tables
    let pb2 = spinner(
        "2/2",
        &format!("Appending to {}...", resolved.output_dir.display()),
    );
    let written = write_all(&mut store, &data, WriteMode::Append).with_context(|| {
        format!(
            "Failed to append tables in {}",
            resolved.output_dir.display()
        )
    })?;
    pb2.finish_with_message(format!(
        "Appending to {}... ✓",
        resolved.output_dir.display()
    ));

    print_summary(&data);
    eprintln!(
        "\n✓ Appended {} rows across {} tables → {}",
        written,
        data.tables.len(),
        resolved.output_dir.display()
    );

    lock::record_run(&resolved.output_dir, plan, &data)?;

    Ok(())
}
