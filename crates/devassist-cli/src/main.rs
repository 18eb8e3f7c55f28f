//! `devassist` binary

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = devassist_cli::cli().get_matches();
    devassist_cli::init_tracing(matches.get_flag("verbose"));

    match devassist_cli::run(&matches, &mut std::io::stdout()).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
