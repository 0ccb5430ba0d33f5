//! nacha-merge CLI
//!
//! Imports ACH files from CSV, merges them under line and dollar limits,
//! writes each output as a fixed-width NACHA file and prints a summary CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --out-dir merged --max-lines 10000 a.csv b.csv > summary.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `NACHA_MAX_LINES`, `NACHA_MAX_DOLLAR_AMOUNT`: defaults for the limit flags

use clap::Parser;
use log::info;
use nacha_merge::cli::CliArgs;
use nacha_merge::{import, merge_files_with, report, writer, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::process;

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let conditions = args.conditions()?;
    let opts = args.validate_opts();

    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let reader = BufReader::new(File::open(path)?);
        let mut file = import::read_file_csv(reader)?;
        file.set_validation(opts);
        info!("Read {} with {} entries", path.display(), file.entry_count());
        inputs.push(file);
    }

    let merged = merge_files_with(&inputs, conditions)?;

    fs::create_dir_all(&args.out_dir)?;
    for (i, file) in merged.iter().enumerate() {
        let path = args.out_dir.join(format!("merged-{:03}.ach", i + 1));
        let mut out = BufWriter::new(File::create(&path)?);
        writer::write_file(file, &mut out)?;
        out.flush()?;
        info!("Wrote {}", path.display());
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    report::write_summary(&merged, handle)?;

    Ok(())
}
