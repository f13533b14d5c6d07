mod app_error;
pub mod routes;
mod startup;
mod utils;

pub use app_error::{AppError, ErrorBody};
pub use routes::*;
pub use startup::*;
pub use utils::*;
