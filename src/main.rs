//! CLI entry point for the microscopy stack builder

use clap::Parser;
use stackbuilder::io::cli::{Cli, StackProcessor};

fn main() -> stackbuilder::Result<()> {
    let cli = Cli::parse();
    let mut processor = StackProcessor::new(cli);
    processor.process()
}
