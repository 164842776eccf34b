//! Integration test harness and prediction client for the disease
//! prediction API.

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod patient;
pub mod prediction;
pub mod storage;
pub mod testing;
pub mod ui;

pub use config::ProbeConfig;
pub use error::{ProbeError, Result};
