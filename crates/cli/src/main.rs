use std::process::ExitCode;

fn main() -> ExitCode {
    foodshop_cli::run()
}
