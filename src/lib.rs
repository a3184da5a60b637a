pub mod api;
pub mod cli;
pub mod dom;
pub mod edit;
pub mod io;
pub mod logging;
pub mod model;
pub mod tui;
pub mod util;
