//! dis6502 CLI
//!
//! Command-line tool for disassembling 6502 binaries, classifying them as
//! code or data, and training the classifier model interactively.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dis6502::{classify_buffer, disassemble, grid, Model, TrainingSession, TRAINING_WINDOW};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// 6502 disassembler with trainable code/data classification.
///
/// Disassembles raw binaries, labels instruction windows with a linear
/// classifier, and learns from interactive feedback.
#[derive(Parser, Debug)]
#[command(name = "dis6502")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Operating mode
    #[arg(short = 'M', long, default_value = "disasm")]
    mode: Mode,

    /// Classifier model file (created if missing)
    #[arg(short, long, default_value = "CODE_MODEL.json")]
    model: PathBuf,

    /// Feedback rounds per file in learn mode
    #[arg(short, long, default_value = "5")]
    tries: u32,

    /// Load address of the binaries ($hex or decimal)
    #[arg(short, long, default_value = "0", value_parser = parse_address)]
    load_address: u16,

    /// Write a PGM classification map per file into this directory
    #[arg(long)]
    grid_dir: Option<PathBuf>,

    /// Seed for the training window randomizer (reproducible sessions)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only output essential info)
    #[arg(short, long)]
    quiet: bool,
}

/// Operating mode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Disassemble and label windows with the classifier
    Disasm,
    /// Interactive training session per file
    Learn,
    /// Plain disassembly without classification
    Dump,
}

/// Parse a load address: `$` prefix for hex, plain decimal otherwise.
fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = s.strip_prefix('$') {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging if verbose
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("dis6502=debug")
            .init();
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let mut model = Model::load(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    let mut success = true;

    for path in &args.files {
        let result = match args.mode {
            Mode::Disasm => process_disasm(path, &model, args),
            Mode::Dump => process_dump(path, args),
            Mode::Learn => process_learn(path, &mut model, args),
        };
        if let Err(e) = result {
            if !args.quiet {
                eprintln!("Error processing {}: {e:#}", path.display());
            }
            success = false;
        }
    }

    if args.mode == Mode::Learn {
        model
            .save(&args.model)
            .with_context(|| format!("saving model {}", args.model.display()))?;
    }

    Ok(success)
}

fn process_disasm(path: &Path, model: &Model, args: &Args) -> anyhow::Result<()> {
    let data = fs::read(path)?;
    let windows = classify_buffer(model, &data, args.load_address)?;

    if !args.quiet {
        println!("File: {}", path.display());
    }
    for window in &windows {
        for insn in &window.instructions {
            println!("{:<6} {}", window.label, insn);
        }
    }

    if let Some(dir) = &args.grid_dir {
        write_grid(dir, path, &windows)?;
    }
    Ok(())
}

fn process_dump(path: &Path, args: &Args) -> anyhow::Result<()> {
    let data = fs::read(path)?;
    if !args.quiet {
        println!("File: {}", path.display());
    }
    for insn in disassemble(&data, args.load_address) {
        println!("{insn}");
    }
    Ok(())
}

fn process_learn(path: &Path, model: &mut Model, args: &Args) -> anyhow::Result<()> {
    let data = fs::read(path)?;
    if data.len() < TRAINING_WINDOW {
        if !args.quiet {
            eprintln!(
                "Skipping {}: {} bytes is below the {TRAINING_WINDOW}-byte training window",
                path.display(),
                data.len()
            );
        }
        return Ok(());
    }

    if !args.quiet {
        println!("Training on {}", path.display());
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = TrainingSession::new(rng, stdin.lock(), stdout.lock(), args.tries);
    session.run(model, &data, args.load_address)?;
    Ok(())
}

fn write_grid(dir: &Path, source: &Path, windows: &[dis6502::LabeledWindow]) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    let stem = source
        .file_name()
        .map_or_else(|| "out".into(), |n| n.to_string_lossy());
    let target = dir.join(format!("{stem}.pgm"));

    let labels: Vec<String> = windows.iter().map(|w| w.label.clone()).collect();
    let file = fs::File::create(&target)?;
    let mut out = BufWriter::new(file);
    grid::write_pgm(&mut out, &stem, &labels)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from(["dis6502", "game.prg"]).unwrap();
        assert_eq!(args.files.len(), 1);
        assert_eq!(args.mode, Mode::Disasm);
        assert_eq!(args.tries, 5);
        assert_eq!(args.model, PathBuf::from("CODE_MODEL.json"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_multiple_files() {
        let args = Args::try_parse_from(["dis6502", "a.prg", "b.prg"]).unwrap();
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_mode_option() {
        let args = Args::try_parse_from(["dis6502", "-M", "learn", "a.prg"]).unwrap();
        assert_eq!(args.mode, Mode::Learn);
    }

    #[test]
    fn test_load_address_hex_and_decimal() {
        let args = Args::try_parse_from(["dis6502", "-l", "$C000", "a.prg"]).unwrap();
        assert_eq!(args.load_address, 0xC000);
        let args = Args::try_parse_from(["dis6502", "-l", "4096", "a.prg"]).unwrap();
        assert_eq!(args.load_address, 0x1000);
    }

    #[test]
    fn test_bad_load_address_rejected() {
        assert!(Args::try_parse_from(["dis6502", "-l", "$GG", "a.prg"]).is_err());
        assert!(Args::try_parse_from(["dis6502", "-l", "99999", "a.prg"]).is_err());
    }
}
