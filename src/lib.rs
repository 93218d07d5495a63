pub mod app;
pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod filter;
pub mod output;
pub mod parsers;
pub mod registry;
pub mod scheduler;
pub mod stats;
pub mod walker;
pub mod worker;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
