use std::process::ExitCode;

fn main() -> ExitCode {
    rpsqueue::app::startup::startup()
}
