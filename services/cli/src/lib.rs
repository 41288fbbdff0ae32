mod cli;
mod commands;
mod infra;

use talent_assess::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
