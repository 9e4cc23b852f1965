pub mod config;
pub mod feed;
pub mod matches;
pub mod monitoring;
pub mod server;
