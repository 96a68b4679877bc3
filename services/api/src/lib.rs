mod cli;
mod infra;
mod pipeline;
mod routes;
mod server;

use early_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
