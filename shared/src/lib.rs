mod error;
mod executor;
pub mod models;

pub use error::Error;
pub use executor::{ActionExecutor, Audience, BroadcastReport, Filter, Query};

pub type Result<T> = std::result::Result<T, Error>;
