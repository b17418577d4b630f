use std::process::ExitCode;

fn main() -> ExitCode {
    codecoach_cli::run()
}
