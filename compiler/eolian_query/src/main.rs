//! The executable that prints what an Eolian database holds.

use std::process::ExitCode;

use clap::Parser;
use eolian_query::Arguments;

fn main() -> ExitCode {
    env_logger::init();

    eolian_query::run(Arguments::parse())
}
