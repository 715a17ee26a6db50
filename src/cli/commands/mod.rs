pub mod config;
pub mod istat;
pub mod resolve;
pub mod validate;
pub mod version;
