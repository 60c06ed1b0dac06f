//! CLI tool for building, running and checking n-bit adder circuits.

mod cli;

use adder::{AdderCircuit, MAX_VERIFY_BITS, verify_exhaustive};
use anyhow::{Context, Result, bail};
use cli::{AddCommand, CircuitArgs, Cli, Command, StatsCommand, VerifyCommand};
use indicatif::ProgressBar;
use nandgraph_logic as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Used by the integration tests.
#[cfg(test)]
use assert_cmd as _;
#[cfg(test)]
use predicates as _;
#[cfg(test)]
use rand as _;
#[cfg(test)]
use rand_chacha as _;

fn main() -> Result<()> {
    let args = Cli::parse_args();
    init_tracing(args.verbose);

    match args.command {
        Command::Add(cmd) => run_add(cmd),
        Command::Stats(cmd) => run_stats(cmd),
        Command::Verify(cmd) => run_verify(cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(args: &CircuitArgs) -> Result<AdderCircuit> {
    let mut adder = AdderCircuit::generate(args.bits)
        .with_context(|| format!("building {}-bit adder", args.bits))?;
    if args.nand {
        adder.decompose().context("decomposing adder to NAND")?;
    }
    info!(bits = args.bits, nand = args.nand, gates = adder.circuit().num_gates(), "built adder");
    Ok(adder)
}

fn run_add(cmd: AddCommand) -> Result<()> {
    let mut adder = build(&cmd.circuit)?;
    let total = adder.add(cmd.a, cmd.b)?;

    let n = adder.n_bits();
    let sum = total & adder.max_operand();
    let carry = total >> n;

    println!("{} + {} = {}", cmd.a, cmd.b, total);
    println!("  Sum bits:  {sum:0n$b}");
    println!("  Carry out: {carry}");
    Ok(())
}

fn run_stats(cmd: StatsCommand) -> Result<()> {
    let adder = build(&cmd.circuit)?;
    let stats = adder.stats()?;

    println!("Circuit statistics ({}-bit adder):", stats.n_bits);
    println!("  Primary inputs:  {}", stats.inputs);
    println!("  Outputs:         {}", stats.outputs);
    println!("  Wires:           {}", stats.wires);
    println!("  Total gates:     {}", stats.gates.total());
    for (ty, count) in stats.gates.iter() {
        println!("  {:<17}{count}", format!("{ty} gates:"));
    }
    println!("  Max depth:       {}", stats.max_depth);
    Ok(())
}

fn run_verify(cmd: VerifyCommand) -> Result<()> {
    if cmd.bits > MAX_VERIFY_BITS {
        bail!("exhaustive check is limited to {MAX_VERIFY_BITS} bits");
    }

    println!("Checking all {}-bit operand pairs...", cmd.bits);
    let pb = ProgressBar::new(1u64 << cmd.bits);
    let mismatch = verify_exhaustive(cmd.bits, |_| pb.inc(1))?;
    pb.finish_and_clear();

    match mismatch {
        None => {
            println!("OK: {} pairs match", 1u64 << (2 * cmd.bits));
            Ok(())
        }
        Some(m) => bail!(
            "mismatch at {} + {}: original gave {}, NAND gave {}",
            m.a,
            m.b,
            m.original,
            m.nand
        ),
    }
}
