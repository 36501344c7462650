pub mod config;
pub mod export;
pub mod find;
pub mod models;
pub mod progress;
pub mod providers;
pub mod test;
