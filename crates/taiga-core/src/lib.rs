pub mod config;
pub mod download;
pub mod http;
pub mod pdf;
pub mod scrape;
pub mod scratch;
pub mod session;
pub mod split;
