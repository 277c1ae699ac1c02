//! Logicsim - interactive four-valued logic circuit simulator
//!
//! Loads a built-in demo circuit and drops into a console where switches
//! can be toggled and probe readings inspected.
//!
//! # Usage
//!
//! ```bash
//! logicsim nand
//! > toggle in1
//! > toggle in2
//! ```

use clap::Parser;
use logicsim_core::{console, error::Result, DEFAULT_STEP_LIMIT};

/// Four-valued digital logic circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Demo circuit to load (inverter, nand, xor)
    #[arg(value_name = "DEMO", default_value = "inverter")]
    demo: String,

    /// Worklist step limit per tick
    #[arg(short, long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut schematic = console::build_demo(&args.demo)?.with_step_limit(args.step_limit);
    console::run(&mut schematic)
}
