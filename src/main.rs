use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match movement_client::run_with_config().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "movement watcher stopped");
            ExitCode::FAILURE
        }
    }
}
