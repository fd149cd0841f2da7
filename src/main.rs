use sports_trivia_backend::telemetry;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), api::AppError> {
    // A missing .env file is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();
    telemetry::init();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => error!(error = %e, "failed to read .env"),
    }

    if let Err(e) = api::start().await {
        error!(error = %e, "server terminated");
        return Err(e);
    }
    Ok(())
}
