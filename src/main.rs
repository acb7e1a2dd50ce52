use std::process::ExitCode;

fn main() -> ExitCode {
    codetree::cli::run()
}
