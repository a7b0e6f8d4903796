use clap::Parser;
use nightrate::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
