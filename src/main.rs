use clap::Parser;
use tradeplot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
