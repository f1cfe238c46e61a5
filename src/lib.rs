pub mod cli;
pub mod config;
pub mod consensus;
pub mod history;
pub mod logging;
pub mod mapping;
pub mod search;
pub mod title;
