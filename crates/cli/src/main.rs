use std::process::ExitCode;

fn main() -> ExitCode {
    orglens_cli::run()
}
