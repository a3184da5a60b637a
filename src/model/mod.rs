pub mod config;
pub mod post;
pub mod user;

pub use config::*;
pub use post::*;
pub use user::*;
