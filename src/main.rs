mod commands;
mod notes;
mod process;

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use process::Process;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the ELF binary or core file
    #[arg(short, long)]
    filename: PathBuf,

    /// Print all available information
    #[arg(short, long)]
    all: bool,

    /// Print the ELF header
    #[arg(long)]
    header: bool,

    /// Print the section table
    #[arg(long)]
    sections: bool,

    /// Print the program headers
    #[arg(long)]
    progs: bool,

    /// Print imported symbols and needed libraries
    #[arg(long)]
    imports: bool,

    /// Print every note record
    #[arg(long)]
    notes: bool,

    /// Print the decoded NT_PRSTATUS note and registers
    #[arg(long)]
    prstatus: bool,

    /// Print the decoded NT_PRPSINFO note
    #[arg(long)]
    prpsinfo: bool,

    /// Print the symbol table
    #[arg(long)]
    symbols: bool,
}

/// Most of the file can still be useful when one part is damaged, so a
/// failing command is logged and the rest keep going.
fn run(which: &'static str, result: Result<()>) {
    if let Err(e) = result {
        log::warn!("{which}: {e:#}");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let file = File::open(&cli.filename)
        .with_context(|| format!("couldn't open {}", cli.filename.display()))?;
    // Unsafe because the underlying file must not change while mapped.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("couldn't map {}", cli.filename.display()))?;
    let process = Process::parse(&mmap)
        .with_context(|| format!("couldn't parse {}", cli.filename.display()))?;

    if cli.all || cli.header {
        commands::print_header(&process);
    }
    if cli.all || cli.sections {
        run("sections", commands::print_sections(&process));
    }
    if cli.all || cli.progs {
        commands::print_progs(&process);
    }
    if cli.all || cli.imports {
        run("imports", commands::print_imports(&process));
    }
    if cli.all || cli.notes {
        run("notes", commands::print_notes(&process));
    }
    if cli.all || cli.prstatus {
        run("prstatus", commands::print_prstatus(&process));
    }
    if cli.all || cli.prpsinfo {
        run("prpsinfo", commands::print_prpsinfo(&process));
    }
    if cli.all || cli.symbols {
        run("symbols", commands::print_symbols(&process));
    }
    Ok(())
}
