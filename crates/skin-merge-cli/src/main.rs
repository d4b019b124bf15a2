//! Command-line front end for merging skin weights between scene meshes.
//!
//! Reads a JSON scene, copies weights from the base meshes onto the output
//! mesh, and writes the scene back.
//!
//! Run: `cargo run -p skin-merge-cli -- scene.json --base fringe --base ponytail --into hair`

mod cli;
mod run;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let report = run::run(&args)?;

    if !report.output_bound {
        println!("Output mesh has no skin binding; nothing was merged.");
    }
    for base in &report.unbound_bases {
        println!("Skipped {base}: no skin binding");
    }
    for failure in &report.failures {
        println!(
            "Could not write {} (from {}): {}",
            failure.vertex, failure.base, failure.reason
        );
    }

    println!("Done");
    Ok(())
}
