use clap::{Args, Parser, Subcommand};

/// Ripple-carry adder generator and checker
#[derive(Parser, Debug)]
#[command(name = "adder")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Add two numbers with an n-bit adder circuit
    Add(AddCommand),
    /// Print gate, wire and depth statistics for an n-bit adder
    Stats(StatsCommand),
    /// Exhaustively check the NAND rewrite of an n-bit adder
    Verify(VerifyCommand),
}

#[derive(Args, Debug)]
pub(crate) struct CircuitArgs {
    /// Number of bits for each operand
    #[arg(value_name = "BITS")]
    pub(crate) bits: usize,

    /// Decompose the circuit to NAND gates first
    #[arg(long)]
    pub(crate) nand: bool,
}

#[derive(Parser, Debug)]
pub(crate) struct AddCommand {
    #[command(flatten)]
    pub(crate) circuit: CircuitArgs,

    /// First operand
    #[arg(value_name = "A")]
    pub(crate) a: u64,

    /// Second operand
    #[arg(value_name = "B")]
    pub(crate) b: u64,
}

#[derive(Parser, Debug)]
pub(crate) struct StatsCommand {
    #[command(flatten)]
    pub(crate) circuit: CircuitArgs,
}

#[derive(Parser, Debug)]
pub(crate) struct VerifyCommand {
    /// Number of bits for each operand
    #[arg(value_name = "BITS")]
    pub(crate) bits: usize,
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
