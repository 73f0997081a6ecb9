use clap::Parser;
use fincast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
