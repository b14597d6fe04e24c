use std::process::ExitCode;

fn main() -> ExitCode {
    yardage_cli::run()
}
