#![forbid(unsafe_code)]
//! Writes shell completions and the man page for `foldview`.
//!
//! Usage: `generate-assets [OUT_DIR]` (default `dist`).

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use foldview::cli::Args;
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dist"));
    let completions_dir = out_dir.join("completions");
    let man_dir = out_dir.join("man");

    fs::create_dir_all(&completions_dir)?;
    fs::create_dir_all(&man_dir)?;

    let mut written = Vec::new();
    for shell in Shell::value_variants() {
        let mut cmd = Args::command();
        written.push(generate_to(*shell, &mut cmd, "foldview", &completions_dir)?);
    }

    let mut page = Vec::new();
    Man::new(Args::command()).render(&mut page)?;
    let man_path = man_dir.join("foldview.1");
    fs::write(&man_path, page)?;
    written.push(man_path);

    for path in &written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
