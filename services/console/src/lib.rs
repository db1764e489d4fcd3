mod cli;
mod commands;
mod infra;
mod interactive;

use ai_bos::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
