mod approval;
mod casework;
mod cli;
mod compliance;
mod distribution;
mod infra;

use collection_desk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
