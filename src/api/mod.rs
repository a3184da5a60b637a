pub mod client;
pub mod endpoints;
pub mod options;

pub use client::{ApiError, HttpClient, PostApi};
pub use endpoints::Endpoints;
pub use options::{Method, RequestOptions, build_options};
