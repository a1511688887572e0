pub mod config;
pub mod download;
pub mod repositories;
pub mod script;
