pub mod blobs;
pub mod config;
pub mod constants;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logging;
pub mod server;
pub mod storage;
