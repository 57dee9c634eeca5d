use anyhow::{Context, Result};
use clap::Parser;
use day6::CLIArgs;
use tracing::info;

fn main() -> Result<()> {
    day6::init_tracing();
    let args = CLIArgs::parse();
    let (lab, guard) = day6::read_lab(&args.input_path).with_context(|| {
        format!(
            "Failed to read laboratory from given file({}).",
            args.input_path.display()
        )
    })?;

    let patrol_n = day6::patrol_positions(&lab, &guard).len();
    info!(guard = %guard, positions = patrol_n, "Guard left the laboratory");
    println!("{}", patrol_n);

    Ok(())
}
