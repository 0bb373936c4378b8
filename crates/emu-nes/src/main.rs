//! NES emulator binary.
//!
//! Headless: loads a ROM, runs it either for a fixed number of driven
//! instructions or until it parks in its idle loop, then prints the CPU
//! state, the most recent trace entries and any requested queries.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use emu_core::{Observable, Value};
use emu_nes::{Nes, NesConfig, NesError, NesRegion};
use serde::Serialize;

/// Instruction-level NES runner
#[derive(Parser, Debug)]
#[command(name = "emu-nes")]
#[command(about = "Run an NROM cartridge on an instruction-level NES", long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    #[arg(short, long)]
    rom: PathBuf,

    /// Video region (sets the vblank period)
    #[arg(long, value_enum, default_value_t = NesRegion::Ntsc)]
    region: NesRegion,

    /// Run this many instructions instead of running until idle
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Wall-clock budget for running until idle
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Start from the reset vector rather than $8000
    #[arg(long)]
    reset: bool,

    /// Number of trace entries to print
    #[arg(long, default_value = "10")]
    trace: usize,

    /// Observable path to print, e.g. `memory.$0300` (repeatable)
    #[arg(short, long)]
    query: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    instructions: u64,
    cycles: u64,
    registers: BTreeMap<&'static str, Value>,
    trace: Vec<String>,
    queries: BTreeMap<String, Option<Value>>,
}

fn run(args: &Args) -> Result<Report, NesError> {
    let rom_data = std::fs::read(&args.rom)?;
    let config = NesConfig {
        region: args.region,
        load_timeout: Duration::from_millis(args.timeout_ms),
        ..NesConfig::new(rom_data)
    };
    let mut nes = Nes::new(&config)?;
    eprintln!("Loaded ROM: {}", args.rom.display());
    if args.reset {
        nes.reset()?;
    }

    let instructions = match args.ticks {
        Some(ticks) => {
            for _ in 0..ticks {
                nes.step()?;
            }
            ticks
        }
        None => nes.run_until_idle()?,
    };

    Ok(report(&nes, args, instructions))
}

fn report(nes: &Nes, args: &Args, instructions: u64) -> Report {
    let registers = ["pc", "a", "x", "y", "s", "p"]
        .into_iter()
        .filter_map(|name| nes.query(name).map(|v| (name, v)))
        .collect();
    let trace = nes
        .trace()
        .iter()
        .take(args.trace)
        .map(ToString::to_string)
        .collect();
    let queries = args
        .query
        .iter()
        .map(|path| (path.clone(), nes.query(path)))
        .collect();
    Report {
        instructions,
        cycles: nes.cpu().cycles(),
        registers,
        trace,
        queries,
    }
}

fn print_text(report: &Report) {
    println!(
        "{} instructions, {} cycles",
        report.instructions, report.cycles
    );
    let regs: Vec<String> = report
        .registers
        .iter()
        .map(|(name, value)| format!("{}={value}", name.to_uppercase()))
        .collect();
    println!("{}", regs.join(" "));
    if !report.trace.is_empty() {
        println!("Trace (newest first):");
        for line in &report.trace {
            println!("  {line}");
        }
    }
    for (path, value) in &report.queries {
        match value {
            Some(v) => println!("{path} = {v}"),
            None => println!("{path} = <unknown path>"),
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    } else {
        print_text(&report);
    }
}
