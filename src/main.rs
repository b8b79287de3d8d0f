use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match netscript::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("netscript: {err:#}");
            ExitCode::FAILURE
        }
    }
}
