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

    let loop_positions = day6::find_possible_obstructions(&lab, guard.pos(), guard.dir());
    info!(
        guard = %guard,
        locations = loop_positions.len(),
        "Found obstruction locations which make guard loop"
    );
    println!("{}", loop_positions.len());

    Ok(())
}
