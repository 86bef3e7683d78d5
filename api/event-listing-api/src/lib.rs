pub mod error;
pub mod http;

pub use error::ServiceError;
pub use http::{AppState, HttpSettings, page::ListingPage, router, run};
