use std::process::ExitCode;

mod platform;

fn main() -> ExitCode {
    let command = match platform::Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", platform::USAGE);
            return ExitCode::from(2);
        }
    };

    match platform::run_app(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("news_dashboard: {err}");
            ExitCode::FAILURE
        }
    }
}
