pub mod config_io;
pub mod local_storage;
