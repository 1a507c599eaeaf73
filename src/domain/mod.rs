//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod indicator;
pub mod frame;
pub mod strategy;
pub mod position;
pub mod runner;
pub mod metrics;
pub mod config_validation;
pub mod error;
