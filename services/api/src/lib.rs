mod cli;
mod infra;
mod questionnaire;
mod routes;
mod server;

use exposure_check::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
